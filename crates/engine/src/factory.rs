//! Event registry and factory
//!
//! The registry is an explicit table filled at startup, one
//! [`EventFactory::register`] call per event type. Each entry records the
//! type's category, name and eligibility and a plain constructor function, so
//! creating an instance later costs one function call and no lookup beyond
//! the table itself.
//!
//! Registering the same type (or another type with the same name) twice is a
//! configuration error rather than a silent "first one wins".

use std::any::TypeId;
use std::collections::HashMap;

use crate::event::{short_type_name, Eligibility, Event, EventInstance, RegisteredEvent};
use crate::ports::RandomPort;
use crate::{EngineError, Simulation};

/// One row of the registry.
pub struct EventEntry<S: Simulation> {
    pub category: S::Category,
    pub name: &'static str,
    pub eligibility: Eligibility,
    create: fn() -> Box<dyn Event<S>>,
}

impl<S: Simulation> EventEntry<S> {
    fn instantiate(&self) -> EventInstance<S> {
        EventInstance::new(self.category, self.eligibility, self.name, (self.create)())
    }
}

fn construct<S: Simulation, E: RegisteredEvent<S>>() -> Box<dyn Event<S>> {
    Box::new(E::create())
}

pub struct EventFactory<S: Simulation> {
    entries: Vec<EventEntry<S>>,
    by_type: HashMap<TypeId, usize>,
}

impl<S: Simulation> Default for EventFactory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Simulation> EventFactory<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_type: HashMap::new(),
        }
    }

    /// Add an event type to the registry.
    pub fn register<E: RegisteredEvent<S>>(&mut self) -> Result<(), EngineError> {
        let name = short_type_name::<E>();
        let type_id = TypeId::of::<E>();

        if self.by_type.contains_key(&type_id) || self.entries.iter().any(|e| e.name == name) {
            return Err(EngineError::DuplicateEvent { name });
        }

        tracing::debug!(
            event = name,
            category = ?E::CATEGORY,
            eligibility = %E::ELIGIBILITY,
            "Registered event"
        );

        self.by_type.insert(type_id, self.entries.len());
        self.entries.push(EventEntry {
            category: E::CATEGORY,
            name,
            eligibility: E::ELIGIBILITY,
            create: construct::<S, E>,
        });
        Ok(())
    }

    /// Create an instance of a specific registered type.
    pub fn create_instance<E: RegisteredEvent<S>>(&self) -> Result<EventInstance<S>, EngineError> {
        self.by_type
            .get(&TypeId::of::<E>())
            .map(|&index| self.entries[index].instantiate())
            .ok_or_else(|| EngineError::UnregisteredEvent(short_type_name::<E>().to_string()))
    }

    /// Create an instance by registered name.
    pub fn create_by_name(&self, name: &str) -> Result<EventInstance<S>, EngineError> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(EventEntry::instantiate)
            .ok_or_else(|| EngineError::UnregisteredEvent(name.to_string()))
    }

    /// Draw one random-eligible event of `category` uniformly.
    ///
    /// Returns `None` when the category has no random-eligible events.
    pub fn create_random_by_type(
        &self,
        category: S::Category,
        rng: &mut dyn RandomPort,
    ) -> Option<EventInstance<S>> {
        let eligible: Vec<&EventEntry<S>> = self
            .entries
            .iter()
            .filter(|entry| entry.category == category && entry.eligibility.is_random())
            .collect();

        if eligible.is_empty() {
            return None;
        }

        let last = u32::try_from(eligible.len() - 1).unwrap_or(u32::MAX);
        let index = rng.gen_range(0, last) as usize;
        eligible.get(index).map(|entry| entry.instantiate())
    }

    pub fn is_registered<E: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<E>())
    }

    /// Entries of one category, in registration order.
    pub fn entries_in(&self, category: S::Category) -> impl Iterator<Item = &EventEntry<S>> {
        self.entries
            .iter()
            .filter(move |entry| entry.category == category)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ports::{FixedRandom, SeededRandom};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Category {
        Weather,
        Wild,
    }

    struct Trail {
        log: Vec<String>,
    }

    impl Simulation for Trail {
        type Entity = u8;
        type Category = Category;
    }

    macro_rules! test_event {
        ($name:ident, $category:expr, $eligibility:expr) => {
            struct $name {
                created: bool,
            }

            impl Event<Trail> for $name {
                fn execute(&mut self, _target: &u8, state: &mut Trail) {
                    state.log.push(stringify!($name).to_string());
                }

                fn render(&self, _target: &u8, _state: &Trail) -> String {
                    format!("{} (created: {})", stringify!($name), self.created)
                }
            }

            impl RegisteredEvent<Trail> for $name {
                const CATEGORY: Category = $category;
                const ELIGIBILITY: Eligibility = $eligibility;

                fn create() -> Self {
                    Self { created: true }
                }
            }
        };
    }

    test_event!(Hail, Category::Weather, Eligibility::RandomOrManual);
    test_event!(Fog, Category::Weather, Eligibility::RandomOrManual);
    test_event!(Drought, Category::Weather, Eligibility::RandomOrManual);
    test_event!(Tornado, Category::Weather, Eligibility::ManualOnly);
    test_event!(Snakebite, Category::Wild, Eligibility::ManualOnly);

    fn weather_factory() -> EventFactory<Trail> {
        let mut factory = EventFactory::new();
        factory.register::<Hail>().unwrap();
        factory.register::<Fog>().unwrap();
        factory.register::<Drought>().unwrap();
        factory.register::<Tornado>().unwrap();
        factory
    }

    #[test]
    fn when_registered_twice_then_duplicate_error() {
        let mut factory = EventFactory::<Trail>::new();
        factory.register::<Hail>().unwrap();

        let err = factory.register::<Hail>().unwrap_err();
        assert_eq!(err, EngineError::DuplicateEvent { name: "Hail" });
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn when_type_unregistered_then_hard_error() {
        let factory = weather_factory();
        let err = factory.create_instance::<Snakebite>().unwrap_err();
        assert_eq!(err, EngineError::UnregisteredEvent("Snakebite".to_string()));
    }

    #[test]
    fn create_instance_runs_constructor_and_carries_metadata() {
        let factory = weather_factory();
        let mut instance = factory.create_instance::<Tornado>().unwrap();

        assert_eq!(instance.name(), "Tornado");
        assert_eq!(instance.display_name(), "Tornado");
        assert_eq!(instance.category(), Category::Weather);
        assert_eq!(instance.eligibility(), Eligibility::ManualOnly);

        let mut trail = Trail { log: Vec::new() };
        assert_eq!(instance.render(&0, &trail), "Tornado (created: true)");
        instance.execute(&0, &mut trail);
        assert!(instance.has_executed());
        assert_eq!(trail.log, vec!["Tornado".to_string()]);
    }

    #[test]
    fn when_category_has_no_random_events_then_none() {
        let mut factory = weather_factory();
        factory.register::<Snakebite>().unwrap();
        let mut rng = FixedRandom(0);

        assert!(factory
            .create_random_by_type(Category::Wild, &mut rng)
            .is_none());
    }

    #[test]
    fn create_random_by_type_is_uniform_over_eligible_events() {
        let factory = weather_factory();
        let mut rng = SeededRandom::new(2024);
        let mut counts: HashMap<&'static str, u32> = HashMap::new();

        for _ in 0..10_000 {
            let instance = factory
                .create_random_by_type(Category::Weather, &mut rng)
                .unwrap();
            *counts.entry(instance.name()).or_default() += 1;
        }

        assert!(!counts.contains_key("Tornado"));
        assert_eq!(counts.len(), 3);
        for (name, count) in counts {
            // Expected ~3333 each.
            assert!(
                (3000..3700).contains(&count),
                "{name} drawn {count} times"
            );
        }
    }

    #[test]
    fn create_by_name_and_listing() {
        let factory = weather_factory();
        assert_eq!(factory.names(), vec!["Hail", "Fog", "Drought", "Tornado"]);
        assert_eq!(factory.entries_in(Category::Weather).count(), 4);
        assert_eq!(factory.create_by_name("Fog").unwrap().name(), "Fog");
        assert!(factory.create_by_name("Blizzard").is_err());
        assert!(factory.is_registered::<Hail>());
        assert!(!factory.is_registered::<Snakebite>());
    }
}
