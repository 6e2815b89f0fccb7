//! Keyword-matched FAQ assistant.
//!
//! Messages are lower-cased, trimmed and split into alphanumeric words. An
//! ordered table of rules is walked by [`first_match`]; the first rule with a
//! whole-word phrase or a word-start stem in the message decides the topic.
//! Greetings sit at the top of the table, so "hi, what about my car?" is
//! always a greeting.

use serde::{Deserialize, Serialize};

use crate::error::{FootprintError, Result};

/// Default number of user messages per chat session.
pub const DEFAULT_MESSAGE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Greeting,
    Definition,
    Transportation,
    Energy,
    Diet,
    Waste,
    Water,
    Shopping,
    Default,
}

// ---- Normalized message ---------------------------------------------------

/// A message reduced to lower-case words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    words: Vec<String>,
}

impl Message {
    pub fn parse(raw: &str) -> Self {
        let words = raw
            .trim()
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Message { words }
    }

    /// True if the phrase's words appear contiguously in the message.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        if needle.is_empty() || needle.len() > self.words.len() {
            return false;
        }
        self.words
            .windows(needle.len())
            .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
    }

    /// True if some word starts with `stem`.
    pub fn has_stem(&self, stem: &str) -> bool {
        !stem.is_empty() && self.words.iter().any(|w| w.starts_with(stem))
    }
}

// ---- Rule table -----------------------------------------------------------

/// A predicate paired with the outcome it selects.
pub trait IntentRule {
    type Outcome;

    fn matches(&self, message: &Message) -> bool;
    fn outcome(&self) -> Self::Outcome;
}

/// Fires when any phrase occurs as whole words, or any word starts with a stem.
///
/// Short keywords that prefix unrelated words ("car" in "carbon") belong in
/// `phrases`, never in `stems`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub outcome: T,
    pub phrases: &'static [&'static str],
    pub stems: &'static [&'static str],
}

impl<T: Copy> IntentRule for KeywordRule<T> {
    type Outcome = T;

    fn matches(&self, message: &Message) -> bool {
        self.phrases.iter().any(|p| message.contains_phrase(p))
            || self.stems.iter().any(|s| message.has_stem(s))
    }

    fn outcome(&self) -> T {
        self.outcome
    }
}

/// Ordered, first-match-wins evaluation of a rule table.
pub fn first_match<R: IntentRule>(rules: &[R], message: &Message) -> Option<R::Outcome> {
    rules
        .iter()
        .find(|rule| rule.matches(message))
        .map(|rule| rule.outcome())
}

/// Priority order is the table order.
pub const TOPIC_RULES: [KeywordRule<Topic>; 8] = [
    KeywordRule {
        outcome: Topic::Greeting,
        phrases: &["hi", "hello", "hey", "greetings", "help", "start"],
        stems: &[],
    },
    KeywordRule {
        outcome: Topic::Definition,
        phrases: &[
            "what is carbon footprint",
            "what is a carbon footprint",
            "define carbon footprint",
            "explain carbon footprint",
            "carbon footprint meaning",
            "carbon footprint definition",
        ],
        stems: &[],
    },
    KeywordRule {
        outcome: Topic::Transportation,
        phrases: &["car", "cars", "bus", "buses", "fly"],
        stems: &[
            "train", "transport", "driv", "commut", "vehicle", "travel", "flight", "flying",
        ],
    },
    KeywordRule {
        outcome: Topic::Energy,
        phrases: &["lpg", "cng"],
        stems: &["power", "energ", "electric", "light", "bulb", "appliance", "heating"],
    },
    KeywordRule {
        outcome: Topic::Diet,
        phrases: &["eat", "eats", "eating", "meat", "meats"],
        stems: &["food", "diet", "meal", "vegetarian", "vegan", "produce", "cook"],
    },
    KeywordRule {
        outcome: Topic::Waste,
        phrases: &[],
        stems: &[
            "waste", "garbage", "trash", "recycl", "reus", "dispos", "landfill", "compost",
        ],
    },
    KeywordRule {
        outcome: Topic::Water,
        phrases: &["tap", "taps"],
        stems: &["water", "shower", "bath", "faucet", "laundr", "wash"],
    },
    KeywordRule {
        outcome: Topic::Shopping,
        phrases: &["buy", "buys", "buying", "bought"],
        stems: &["shop", "purchas", "cloth", "electronic", "furniture", "item"],
    },
];

pub fn classify(raw: &str) -> Topic {
    first_match(&TOPIC_RULES, &Message::parse(raw)).unwrap_or(Topic::Default)
}

pub fn get_response(raw: &str) -> &'static str {
    classify(raw).response()
}

pub fn get_suggestions() -> [&'static str; 8] {
    [
        "What is carbon footprint?",
        "How can I reduce my transportation emissions?",
        "What are some energy-saving tips?",
        "How can I make my diet more sustainable?",
        "What are some waste reduction tips?",
        "How can I save water?",
        "What are sustainable shopping tips?",
        "How do I calculate my carbon footprint?",
    ]
}

// ---- Chat session ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub content: String,
}

/// Transcript with a cap on user messages until cleared.
#[derive(Debug, Clone)]
pub struct ChatSession {
    limit: usize,
    asked: usize,
    history: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_LIMIT)
    }
}

impl ChatSession {
    pub fn new(limit: usize) -> Self {
        ChatSession {
            limit,
            asked: 0,
            history: Vec::new(),
        }
    }

    pub fn ask(&mut self, text: &str) -> Result<&'static str> {
        if self.asked >= self.limit {
            return Err(FootprintError::ChatLimitReached { limit: self.limit });
        }
        let reply = get_response(text);
        self.history.push(ChatMessage {
            speaker: Speaker::User,
            content: text.to_string(),
        });
        self.history.push(ChatMessage {
            speaker: Speaker::Assistant,
            content: reply.to_string(),
        });
        self.asked += 1;
        Ok(reply)
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.asked)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.asked = 0;
    }
}

// ---- Canned responses -----------------------------------------------------

impl Topic {
    pub fn response(self) -> &'static str {
        match self {
            Topic::Greeting => GREETING,
            Topic::Definition => DEFINITION,
            Topic::Transportation => TRANSPORTATION,
            Topic::Energy => ENERGY,
            Topic::Diet => DIET,
            Topic::Waste => WASTE,
            Topic::Water => WATER,
            Topic::Shopping => SHOPPING,
            Topic::Default => MENU,
        }
    }
}

const GREETING: &str = "👋 Hello! I'm your Eco-Friendly Assistant. I can help you:

1. 📊 Calculate your carbon footprint
2. 🌱 Get personalized eco-tips
3. 🚗 Learn about sustainable transportation
4. 💡 Discover energy-saving solutions
5. 🍽️ Explore sustainable diet options

What would you like to know?";

const DEFINITION: &str = "🌍 Understanding Your Carbon Footprint:

Your carbon footprint is the total greenhouse gases (mainly CO2) you emit annually. Here's what contributes to it:

1. 🚗 Transportation (25%)
   • Cars, buses, flights
   • Daily commute
   • Travel choices

2. 💡 Energy (30%)
   • Electricity usage
   • Heating/cooling
   • Appliance efficiency

3. 🍽️ Diet (20%)
   • Food choices
   • Meat consumption
   • Food waste

4. 🗑️ Waste (10%)
   • Recycling habits
   • Waste management
   • Product choices

5. 💧 Water (10%)
   • Water usage
   • Hot water heating
   • Water conservation

6. 🛍️ Shopping (5%)
   • Consumer choices
   • Product lifecycle
   • Sustainable shopping

📊 Current Averages:
• Global: 4.79 tonnes CO2/person/year
• India: 1.9 tonnes CO2/person/year

Would you like to calculate your carbon footprint or learn more about any specific category?";

const TRANSPORTATION: &str = "🚗 Sustainable Transportation Guide:

1. 🚌 Public Transport Options:
   • Bus: 0.1 kgCO2/km
   • Train: 0.05 kgCO2/km

2. 🚗 Private Vehicles:
   • Car: 0.2 kgCO2/km
   • Motorcycle: 0.1 kgCO2/km

3. ✈️ Air Travel:
   • Flights: 0.25 kgCO2/km

🌱 Eco-Friendly Tips:
1. Short-term actions:
   • Use public transport
   • Carpool with colleagues
   • Walk or cycle for short distances

2. Long-term actions:
   • Switch to electric vehicles
   • Move closer to work
   • Work from home when possible

Would you like to calculate your transportation emissions or get more specific tips?";

const ENERGY: &str = "💡 Energy Conservation Guide:

1. 🏠 Home Energy:
   • Grid power: 0.85 kgCO2/kWh
   • Solar power: 0.05 kgCO2/kWh
   • Wind power: 0.02 kgCO2/kWh

2. 🔥 Cooking:
   • LPG: 2.5 kgCO2/kg
   • CNG: 2.2 kgCO2/kg
   • Electric: counted with your grid power

🌱 Energy-Saving Tips:
1. Lighting:
   • Use LED bulbs (saves 80% energy)
   • Use natural light when possible
   • Install motion sensors

2. Appliances:
   • Choose 5-star rated appliances
   • Regular maintenance
   • Use power-saving mode

3. Heating/Cooling:
   • Set optimal temperature
   • Use ceiling fans
   • Insulate your home

Would you like to calculate your energy emissions or get more specific tips?";

const DIET: &str = "🍽️ Sustainable Diet Guide:

1. 🥬 Food Types:
   • Vegan: 0.5 kgCO2/meal
   • Vegetarian: 0.8 kgCO2/meal
   • Non-vegetarian: 1.5 kgCO2/meal

2. 🌾 Food Production:
   • Local produce: Lower emissions
   • Imported food: Higher emissions
   • Organic farming: Lower emissions

🌱 Sustainable Eating Tips:
1. Food choices:
   • Eat more plant-based foods
   • Choose local produce
   • Reduce processed foods

2. Shopping habits:
   • Buy in bulk
   • Use reusable bags
   • Plan meals to reduce waste

3. Storage:
   • Proper refrigeration
   • Use airtight containers
   • Regular cleaning

Would you like to calculate your diet-related emissions or get more specific tips?";

const WASTE: &str = "🗑️ Waste Management Guide:

1. 🗑️ Waste Types:
   • Organic: 0.5 kgCO2/kg
   • Plastic: 2.5 kgCO2/kg
   • Paper: 1.0 kgCO2/kg
   • Metal: 2.0 kgCO2/kg

2. ♻️ Management Methods:
   • Recycling: Lowest emissions
   • Composting: Low emissions
   • Landfill: Highest emissions

🌱 Waste Reduction Tips:
1. Reduce:
   • Buy only what you need
   • Choose products with less packaging
   • Use reusable items

2. Reuse:
   • Repair items
   • Donate unused items
   • Use refillable containers

3. Recycle:
   • Separate waste properly
   • Use recycling bins
   • Support recycling programs

Would you like to calculate your waste-related emissions or get more specific tips?";

const WATER: &str = "💧 Water Conservation Guide:

1. 💧 Water Usage:
   • Drinking water: 0.344 kgCO2/m³
   • Hot water: Additional emissions
   • Wastewater treatment: 0.5 kgCO2/m³

2. 🌱 Conservation Tips:
   • Fix leaking taps
   • Use water-efficient fixtures
   • Collect rainwater
   • Reuse greywater

3. 🏠 Room-specific tips:
   • Bathroom: Low-flow fixtures, shorter showers
   • Kitchen: Efficient dishwashing, fix leaks
   • Laundry: Full loads, cold water

Would you like to calculate your water-related emissions or get more specific tips?";

const SHOPPING: &str = "🛍️ Sustainable Shopping Guide:

1. 🛍️ Common Items:
   • Clothing: 2.5 kgCO2/item
   • Electronics: 15.0 kgCO2/item
   • Furniture: 20.0 kgCO2/item

2. 🌱 Sustainable Shopping:
   • Buy second-hand
   • Choose durable items
   • Support local businesses
   • Avoid fast fashion

3. 💡 Smart Shopping Tips:
   • Before buying: Need vs. want
   • While shopping: Eco-friendly products
   • After purchase: Proper maintenance

Would you like to calculate your shopping-related emissions or get more specific tips?";

const MENU: &str = "🌍 I'm here to help you understand your environmental impact. Here are some topics I can help with:

1. 📊 Carbon Footprint Calculation
2. 🚗 Sustainable Transportation
3. 💡 Energy Conservation
4. 🍽️ Sustainable Diet
5. 🗑️ Waste Management
6. 💧 Water Conservation
7. 🛍️ Sustainable Shopping

What would you like to learn more about?";
