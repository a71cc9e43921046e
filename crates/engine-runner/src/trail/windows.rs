//! Trail windows and their forms.

use wolfcurses_engine::{
    Context, DialogForm, DialogResponse, Form, Tick, Transition, Window, WindowId, WindowKind,
};

use super::events::Starvation;
use super::{Category, Target, Trail};

/// Categories rolled once per day on the road, in order. At most one event
/// fires per day.
const DAILY_ROLLS: [Category; 4] = [
    Category::Weather,
    Category::Wildlife,
    Category::Vehicle,
    Category::Person,
];

const ABOUT: &str = "Try taking a journey by covered wagon across 2000 miles of plains, rivers and mountains.\n\
Buy food and clothing at the store before you leave, and keep a spare wheel or two.";

fn back_to_menu(_response: DialogResponse, _data: &mut (), _cx: &mut Context<'_, Trail>) -> Transition<(), Trail> {
    Transition::ClearForm
}

fn end_game(_response: DialogResponse, _data: &mut (), cx: &mut Context<'_, Trail>) -> Transition<(), Trail> {
    cx.state.quit = true;
    Transition::CloseWindow
}

// =============================================================================
// Main menu
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    TravelTheTrail,
    VisitStore,
    CheckSupplies,
    LearnAboutTrail,
    Quit,
}

pub struct MainMenu;

impl WindowKind<Trail> for MainMenu {
    type Command = MainCommand;
    type Data = ();

    const ID: WindowId = WindowId::new("main");

    fn create_data(_state: &Trail) {}

    fn on_window_post_create(window: &mut Window<Self, Trail>, _cx: &mut Context<'_, Trail>) {
        window.set_menu_header("WolfCurses Trail\n\nYou may:");
        window.set_menu_footer("What is your choice?");
        window.add_command(MainCommand::TravelTheTrail, travel_the_trail, "Travel the trail");
        window.add_command(MainCommand::VisitStore, visit_store, "Visit the general store");
        window.add_command(MainCommand::CheckSupplies, check_supplies, "Check supplies");
        window.add_command(MainCommand::LearnAboutTrail, learn_about_trail, "Learn about the trail");
        window.add_command(MainCommand::Quit, quit, "End");
    }
}

fn travel_the_trail(_window: &mut Window<MainMenu, Trail>, cx: &mut Context<'_, Trail>) {
    cx.windows.add(Travel::ID);
}

fn visit_store(_window: &mut Window<MainMenu, Trail>, cx: &mut Context<'_, Trail>) {
    cx.windows.add(Store::ID);
}

fn check_supplies(window: &mut Window<MainMenu, Trail>, cx: &mut Context<'_, Trail>) {
    let text = cx.state.supplies();
    window.set_form(DialogForm::prompt(text, back_to_menu), cx);
}

fn learn_about_trail(window: &mut Window<MainMenu, Trail>, cx: &mut Context<'_, Trail>) {
    window.set_form(DialogForm::prompt(ABOUT, back_to_menu), cx);
}

fn quit(window: &mut Window<MainMenu, Trail>, cx: &mut Context<'_, Trail>) {
    window.set_form(DialogForm::yes_no("Do you really want to quit?", confirm_quit), cx);
}

fn confirm_quit(response: DialogResponse, _data: &mut (), cx: &mut Context<'_, Trail>) -> Transition<(), Trail> {
    if response == DialogResponse::Yes {
        cx.state.quit = true;
    }
    Transition::ClearForm
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCommand {
    BuyFood,
    BuyClothing,
    BuySpareWheel,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    /// 20-pound sack
    Food,
    Clothing,
    SpareWheel,
}

impl Item {
    pub fn price(&self) -> u32 {
        match self {
            Self::Food => 4,
            Self::Clothing => 10,
            Self::SpareWheel => 10,
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            Self::Food => "sacks of food",
            Self::Clothing => "sets of clothing",
            Self::SpareWheel => "spare wheels",
        }
    }

    fn stock(&self, state: &mut Trail, quantity: u32) {
        match self {
            Self::Food => state.food += quantity * 20,
            Self::Clothing => state.clothing += quantity,
            Self::SpareWheel => state.spare_wheels += quantity,
        }
    }
}

pub struct Store;

impl WindowKind<Trail> for Store {
    type Command = StoreCommand;
    type Data = ();

    const ID: WindowId = WindowId::new("store");

    fn create_data(_state: &Trail) {}

    fn on_window_post_create(window: &mut Window<Self, Trail>, cx: &mut Context<'_, Trail>) {
        refresh_store_header(window, cx.state);
        window.set_menu_footer("Which item would you like to buy?");
        window.add_command(StoreCommand::BuyFood, buy_food, "Food");
        window.add_command(StoreCommand::BuyClothing, buy_clothing, "Clothing");
        window.add_command(StoreCommand::BuySpareWheel, buy_spare_wheel, "Spare wheels");
        window.add_command(StoreCommand::Leave, leave_store, "Leave store");
    }

    fn on_form_change(window: &mut Window<Self, Trail>, cx: &mut Context<'_, Trail>) {
        refresh_store_header(window, cx.state);
    }
}

fn refresh_store_header(window: &mut Window<Store, Trail>, state: &Trail) {
    window.set_menu_header(format!("Matt's General Store\nYou have ${}.\n", state.money));
}

fn buy_food(window: &mut Window<Store, Trail>, cx: &mut Context<'_, Trail>) {
    window.set_form(PurchaseForm::new(Item::Food), cx);
}

fn buy_clothing(window: &mut Window<Store, Trail>, cx: &mut Context<'_, Trail>) {
    window.set_form(PurchaseForm::new(Item::Clothing), cx);
}

fn buy_spare_wheel(window: &mut Window<Store, Trail>, cx: &mut Context<'_, Trail>) {
    window.set_form(PurchaseForm::new(Item::SpareWheel), cx);
}

fn leave_store(window: &mut Window<Store, Trail>, cx: &mut Context<'_, Trail>) {
    window.remove_window_next_tick(cx);
}

/// Asks how many units of an item to buy.
pub struct PurchaseForm {
    item: Item,
    notice: Option<&'static str>,
}

impl PurchaseForm {
    pub fn new(item: Item) -> Self {
        Self { item, notice: None }
    }
}

impl Form<(), Trail> for PurchaseForm {
    fn render(&self, _data: &(), state: &Trail) -> String {
        let mut text = String::new();
        if let Some(notice) = self.notice {
            text.push_str(notice);
            text.push_str("\n\n");
        }
        text.push_str(&format!(
            "You have ${}.\nHow many {} would you like? (${} each, ENTER to cancel)",
            state.money,
            self.item.plural(),
            self.item.price()
        ));
        text
    }

    fn on_input(&mut self, input: &str, _data: &mut (), cx: &mut Context<'_, Trail>) -> Transition<(), Trail> {
        let input = input.trim();
        if input.is_empty() {
            return Transition::ClearForm;
        }

        let Ok(quantity) = input.parse::<u32>() else {
            self.notice = Some("Please enter a number.");
            return Transition::Stay;
        };
        let cost = quantity.saturating_mul(self.item.price());
        if cost > cx.state.money {
            self.notice = Some("You can't afford that.");
            return Transition::Stay;
        }

        cx.state.money -= cost;
        self.item.stock(cx.state, quantity);
        tracing::debug!(item = ?self.item, quantity, cost, "Purchased supplies");
        Transition::ClearForm
    }
}

// =============================================================================
// Travel
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelCommand {
    Continue,
    Rest,
    CheckSupplies,
    Leave,
}

pub struct Travel;

impl WindowKind<Trail> for Travel {
    type Command = TravelCommand;
    type Data = ();

    const ID: WindowId = WindowId::new("travel");

    fn create_data(_state: &Trail) {}

    fn on_window_post_create(window: &mut Window<Self, Trail>, cx: &mut Context<'_, Trail>) {
        refresh_travel_header(window, cx.state);
        window.add_command(TravelCommand::Continue, continue_on_trail, "Continue on trail");
        window.add_command(TravelCommand::Rest, rest, "Stop to rest");
        window.add_command(TravelCommand::CheckSupplies, travel_supplies, "Check supplies");
        window.add_command(TravelCommand::Leave, leave_trail, "Return to main menu");
    }

    fn on_form_change(window: &mut Window<Self, Trail>, cx: &mut Context<'_, Trail>) {
        refresh_travel_header(window, cx.state);
    }

    fn on_window_activate(window: &mut Window<Self, Trail>, cx: &mut Context<'_, Trail>) {
        refresh_travel_header(window, cx.state);
    }
}

fn refresh_travel_header(window: &mut Window<Travel, Trail>, state: &Trail) {
    window.set_menu_header(format!(
        "Day {}. {} miles traveled. {} pounds of food.\n",
        state.day, state.miles, state.food
    ));
}

fn continue_on_trail(window: &mut Window<Travel, Trail>, cx: &mut Context<'_, Trail>) {
    window.set_form(Driving, cx);
}

fn rest(window: &mut Window<Travel, Trail>, cx: &mut Context<'_, Trail>) {
    cx.state.day += 1;
    for member in cx.state.party.iter_mut().filter(|member| member.is_alive()) {
        member.health = (member.health + 10).min(100);
    }
    refresh_travel_header(window, cx.state);
}

fn travel_supplies(window: &mut Window<Travel, Trail>, cx: &mut Context<'_, Trail>) {
    let text = cx.state.supplies();
    window.set_form(DialogForm::prompt(text, back_to_menu), cx);
}

fn leave_trail(window: &mut Window<Travel, Trail>, cx: &mut Context<'_, Trail>) {
    window.remove_window_next_tick(cx);
}

/// On the road: one day per tick, with a chance of an event each day.
pub struct Driving;

impl Form<(), Trail> for Driving {
    fn render(&self, _data: &(), state: &Trail) -> String {
        format!(
            "{}\n\nTraveling... Press ENTER to size up the situation.",
            state.supplies()
        )
    }

    fn on_input(&mut self, _input: &str, _data: &mut (), _cx: &mut Context<'_, Trail>) -> Transition<(), Trail> {
        Transition::ClearForm
    }

    fn on_tick(&mut self, _tick: &Tick, _data: &mut (), cx: &mut Context<'_, Trail>) -> Transition<(), Trail> {
        if cx.state.alive() == 0 {
            return Transition::set_form(DialogForm::prompt("Everyone in your party has died.", end_game));
        }
        if cx.state.arrived() {
            return Transition::set_form(DialogForm::prompt(
                "Congratulations! You have made it to the end of the trail.",
                end_game,
            ));
        }

        let fed = cx.state.travel_day();
        if !fed {
            let target = cx.state.someone();
            if let Err(err) = cx.director.trigger_event::<Starvation>(cx.windows, target) {
                tracing::warn!(error = %err, "Starvation event unavailable");
            }
            return Transition::Stay;
        }

        for category in DAILY_ROLLS {
            let target = match category {
                Category::Wildlife | Category::Person => cx.state.someone(),
                Category::Weather | Category::Vehicle => Target::Wagon,
            };
            if cx
                .director
                .trigger_event_by_type(cx.windows, target, category)
                .is_triggered()
            {
                break;
            }
        }
        Transition::Stay
    }
}
