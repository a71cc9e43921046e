//! Trail events.

use wolfcurses_engine::{Eligibility, Event, RegisteredEvent};

use super::{Category, Target, Trail};

// =============================================================================
// Weather
// =============================================================================

#[derive(Debug, Default)]
pub struct Blizzard {
    underdressed: bool,
}

impl Event<Trail> for Blizzard {
    fn execute(&mut self, _target: &Target, state: &mut Trail) {
        state.day += 1;
        self.underdressed = (state.clothing as usize) < state.alive();
        if self.underdressed {
            for member in state.party.iter_mut().filter(|member| member.is_alive()) {
                member.hurt(10);
            }
        }
    }

    fn render(&self, _target: &Target, _state: &Trail) -> String {
        if self.underdressed {
            "A blizzard strikes. You lose a day, and without enough clothing the party suffers from the cold.".to_string()
        } else {
            "A blizzard strikes. You lose a day waiting it out.".to_string()
        }
    }
}

impl RegisteredEvent<Trail> for Blizzard {
    const CATEGORY: Category = Category::Weather;
    const ELIGIBILITY: Eligibility = Eligibility::RandomOrManual;

    fn create() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
pub struct HeavyFog;

impl Event<Trail> for HeavyFog {
    fn name(&self) -> &'static str {
        "Heavy fog"
    }

    fn execute(&mut self, _target: &Target, state: &mut Trail) {
        state.day += 1;
    }

    fn render(&self, _target: &Target, _state: &Trail) -> String {
        "Heavy fog. You lose a day.".to_string()
    }
}

impl RegisteredEvent<Trail> for HeavyFog {
    const CATEGORY: Category = Category::Weather;
    const ELIGIBILITY: Eligibility = Eligibility::RandomOrManual;

    fn create() -> Self {
        Self
    }
}

// =============================================================================
// Wildlife
// =============================================================================

#[derive(Debug, Default)]
pub struct SnakeBite;

impl Event<Trail> for SnakeBite {
    fn name(&self) -> &'static str {
        "Snake bite"
    }

    fn execute(&mut self, target: &Target, state: &mut Trail) {
        if let Target::Member(index) = target {
            if let Some(member) = state.party.get_mut(*index) {
                member.hurt(30);
            }
        }
    }

    fn render(&self, target: &Target, state: &Trail) -> String {
        format!("{} is bitten by a snake.", state.name_of(target))
    }
}

impl RegisteredEvent<Trail> for SnakeBite {
    const CATEGORY: Category = Category::Wildlife;
    const ELIGIBILITY: Eligibility = Eligibility::RandomOrManual;

    fn create() -> Self {
        Self
    }
}

pub const BERRY_POUNDS: u32 = 20;

#[derive(Debug, Default)]
pub struct FindBerries;

impl Event<Trail> for FindBerries {
    fn execute(&mut self, _target: &Target, state: &mut Trail) {
        state.food += BERRY_POUNDS;
    }

    fn render(&self, target: &Target, state: &Trail) -> String {
        format!(
            "{} finds wild berries. You gain {BERRY_POUNDS} pounds of food.",
            state.name_of(target)
        )
    }
}

impl RegisteredEvent<Trail> for FindBerries {
    const CATEGORY: Category = Category::Wildlife;
    const ELIGIBILITY: Eligibility = Eligibility::RandomOrManual;

    fn create() -> Self {
        Self
    }
}

// =============================================================================
// Vehicle
// =============================================================================

pub const WHEEL_REPAIR_DAYS: u32 = 3;

#[derive(Debug, Default)]
pub struct BrokenWheel {
    replaced: bool,
}

impl Event<Trail> for BrokenWheel {
    fn execute(&mut self, _target: &Target, state: &mut Trail) {
        self.replaced = state.spare_wheels > 0;
        if self.replaced {
            state.spare_wheels -= 1;
        } else {
            state.day += WHEEL_REPAIR_DAYS;
        }
    }

    fn render(&self, _target: &Target, _state: &Trail) -> String {
        if self.replaced {
            "A wagon wheel breaks. You replace it with a spare.".to_string()
        } else {
            format!("A wagon wheel breaks. With no spare, repairs take {WHEEL_REPAIR_DAYS} days.")
        }
    }
}

impl RegisteredEvent<Trail> for BrokenWheel {
    const CATEGORY: Category = Category::Vehicle;
    const ELIGIBILITY: Eligibility = Eligibility::RandomOrManual;

    fn create() -> Self {
        Self::default()
    }
}

// =============================================================================
// Person
// =============================================================================

#[derive(Debug, Default)]
pub struct Thief {
    stolen: u32,
}

impl Event<Trail> for Thief {
    fn execute(&mut self, _target: &Target, state: &mut Trail) {
        self.stolen = state.food.min(25);
        state.food -= self.stolen;
    }

    fn render(&self, _target: &Target, _state: &Trail) -> String {
        if self.stolen == 0 {
            "A thief comes during the night but finds nothing worth taking.".to_string()
        } else {
            format!("A thief comes during the night and steals {} pounds of food.", self.stolen)
        }
    }
}

impl RegisteredEvent<Trail> for Thief {
    const CATEGORY: Category = Category::Person;
    const ELIGIBILITY: Eligibility = Eligibility::RandomOrManual;

    fn create() -> Self {
        Self::default()
    }
}

/// Fired by the travel form when the food runs out.
#[derive(Debug, Default)]
pub struct Starvation;

impl Event<Trail> for Starvation {
    fn execute(&mut self, target: &Target, state: &mut Trail) {
        if let Target::Member(index) = target {
            if let Some(member) = state.party.get_mut(*index) {
                member.hurt(20);
            }
        }
    }

    fn render(&self, target: &Target, state: &Trail) -> String {
        format!("You have run out of food. {} is starving.", state.name_of(target))
    }
}

impl RegisteredEvent<Trail> for Starvation {
    const CATEGORY: Category = Category::Person;
    const ELIGIBILITY: Eligibility = Eligibility::ManualOnly;

    fn create() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_no_spare_wheel_then_repair_costs_days() {
        let mut trail = Trail::new();
        let mut event = BrokenWheel::create();

        event.execute(&Target::Wagon, &mut trail);

        assert_eq!(trail.day, 1 + WHEEL_REPAIR_DAYS);
        assert!(event.render(&Target::Wagon, &trail).contains("no spare"));
    }

    #[test]
    fn when_spare_wheel_then_it_is_used() {
        let mut trail = Trail::new();
        trail.spare_wheels = 2;
        let mut event = BrokenWheel::create();

        event.execute(&Target::Wagon, &mut trail);

        assert_eq!(trail.spare_wheels, 1);
        assert_eq!(trail.day, 1);
    }

    #[test]
    fn blizzard_hurts_underdressed_party() {
        let mut trail = Trail::new();
        trail.clothing = 2;
        let mut event = Blizzard::create();

        event.execute(&Target::Wagon, &mut trail);

        assert!(trail.party.iter().all(|member| member.health == 90));
    }

    #[test]
    fn thief_cannot_steal_more_than_there_is() {
        let mut trail = Trail::new();
        trail.food = 10;
        let mut event = Thief::create();

        event.execute(&Target::Wagon, &mut trail);

        assert_eq!(trail.food, 0);
        assert!(event.render(&Target::Wagon, &trail).contains("10 pounds"));
    }

    #[test]
    fn snake_bite_names_its_victim() {
        let mut trail = Trail::new();
        let mut event = SnakeBite::create();

        event.execute(&Target::Member(1), &mut trail);

        assert_eq!(trail.party[1].health, 70);
        assert_eq!(event.render(&Target::Member(1), &trail), "Jed is bitten by a snake.");
    }
}
