//! Demonstration trail simulation.
//!
//! A party, a wagon, some supplies and a distance to cover. Just enough state
//! for the windows and events to have something to change.

pub mod events;
pub mod windows;

use wolfcurses_engine::{Simulation, Tick, WindowKind, WindowRequests};

use self::windows::MainMenu;

pub const TRAIL_LENGTH: u32 = 2000;
pub const MILES_PER_DAY: u32 = 20;
pub const FOOD_PER_PERSON_PER_DAY: u32 = 2;
pub const STARTING_MONEY: u32 = 800;

/// Event categories rolled while travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Weather,
    Wildlife,
    Vehicle,
    Person,
}

/// What an event acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Wagon,
    Member(usize),
}

#[derive(Debug, Clone)]
pub struct Traveler {
    pub name: String,
    pub health: u32,
}

impl Traveler {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            health: 100,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn hurt(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

#[derive(Debug, Clone)]
pub struct Trail {
    pub party: Vec<Traveler>,
    pub money: u32,
    pub food: u32,
    pub clothing: u32,
    pub spare_wheels: u32,
    pub miles: u32,
    pub day: u32,
    pub ticks: u64,
    pub quit: bool,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}

impl Trail {
    pub fn new() -> Self {
        Self {
            party: ["Mary", "Jed", "Sarah", "Eli"]
                .into_iter()
                .map(Traveler::new)
                .collect(),
            money: STARTING_MONEY,
            food: 0,
            clothing: 0,
            spare_wheels: 0,
            miles: 0,
            day: 1,
            ticks: 0,
            quit: false,
        }
    }

    pub fn alive(&self) -> usize {
        self.party.iter().filter(|member| member.is_alive()).count()
    }

    pub fn arrived(&self) -> bool {
        self.miles >= TRAIL_LENGTH
    }

    pub fn name_of(&self, target: &Target) -> &str {
        match target {
            Target::Wagon => "wagon",
            Target::Member(index) => self
                .party
                .get(*index)
                .map(|member| member.name.as_str())
                .unwrap_or("someone"),
        }
    }

    /// Advance one day: cover ground and eat.
    ///
    /// Returns false when the food ran out today.
    pub fn travel_day(&mut self) -> bool {
        self.day += 1;
        self.miles = (self.miles + MILES_PER_DAY).min(TRAIL_LENGTH);

        let needed = FOOD_PER_PERSON_PER_DAY * self.alive() as u32;
        if self.food >= needed {
            self.food -= needed;
            true
        } else {
            self.food = 0;
            false
        }
    }

    /// Pick a living party member, rotating by day.
    pub fn someone(&self) -> Target {
        let living: Vec<usize> = self
            .party
            .iter()
            .enumerate()
            .filter(|(_, member)| member.is_alive())
            .map(|(index, _)| index)
            .collect();
        match living.len() {
            0 => Target::Wagon,
            n => Target::Member(living[self.day as usize % n]),
        }
    }

    pub fn supplies(&self) -> String {
        format!(
            "Day {}. {} of {TRAIL_LENGTH} miles.\nMoney: ${}\nFood: {} pounds\nClothing: {} sets\nSpare wheels: {}",
            self.day, self.miles, self.money, self.food, self.clothing, self.spare_wheels
        )
    }
}

impl Simulation for Trail {
    type Entity = Target;
    type Category = Category;

    fn on_first_tick(&mut self, windows: &mut WindowRequests) {
        windows.add(MainMenu::ID);
    }

    fn on_tick(&mut self, _tick: &Tick) {
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_food_runs_short_then_day_reports_hunger() {
        let mut trail = Trail::new();
        trail.food = 5;

        assert!(!trail.travel_day());
        assert_eq!(trail.food, 0);
        assert_eq!(trail.miles, MILES_PER_DAY);
        assert_eq!(trail.day, 2);
    }

    #[test]
    fn travel_consumes_food_per_living_member() {
        let mut trail = Trail::new();
        trail.food = 100;
        trail.party[0].hurt(200);

        assert!(trail.travel_day());
        assert_eq!(trail.food, 100 - 3 * FOOD_PER_PERSON_PER_DAY);
    }

    #[test]
    fn someone_skips_the_dead() {
        let mut trail = Trail::new();
        for member in trail.party.iter_mut().skip(1) {
            member.hurt(100);
        }

        assert_eq!(trail.someone(), Target::Member(0));
        assert_eq!(trail.name_of(&Target::Member(0)), "Mary");
    }

    #[test]
    fn miles_never_pass_the_end() {
        let mut trail = Trail::new();
        trail.food = 1000;
        trail.miles = TRAIL_LENGTH - 5;

        trail.travel_day();

        assert!(trail.arrived());
        assert_eq!(trail.miles, TRAIL_LENGTH);
    }
}
