//! Platform-neutral chat messages and the formatters that produce them.

use crate::{RatingSummary, RealtimeData};

pub const COLOR_GREEN: u32 = 0x00D100;
pub const COLOR_RED: u32 = 0xFF0000;
pub const COLOR_GRAY: u32 = 0xA9A9A9;

const ARROW_UP: &str = " :arrow_up:";
const ARROW_DOWN: &str = " :arrow_down:";

pub const BOT_DESCRIPTION: &str = "Price Targets bot can be utilized to view price target \
updates and current price targets provided by various analysts. Price target \
updates will get displayed at 7AM MST Monday - Friday";

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// A message for the chat platform: either raw text or a rich embed.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    PlainText(String),
    Embed {
        title: String,
        color: u32,
        description: String,
        fields: Vec<EmbedField>,
    },
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Message::PlainText(content.into())
    }

    pub fn embed(
        title: impl Into<String>,
        color: u32,
        description: impl Into<String>,
        fields: Vec<EmbedField>,
    ) -> Self {
        Message::Embed {
            title: title.into(),
            color,
            description: description.into(),
            fields,
        }
    }

    /// Reply to `pt!help`.
    pub fn help() -> Self {
        Self::embed("Help Menu", COLOR_GREEN, BOT_DESCRIPTION, command_fields())
    }

    /// Posted once in a freshly created bot channel.
    pub fn welcome() -> Self {
        Self::embed("Welcome!", COLOR_GREEN, BOT_DESCRIPTION, command_fields())
    }

    /// Current against previous price targets for one symbol. Arrows mark
    /// moved bounds; the average only drives the color.
    pub fn rating_update(data: &RealtimeData) -> Self {
        let current = &data.rating;
        let previous = &data.rating_history;

        let color = match trend(Some(current.average), Some(previous.average)) {
            Trend::Up => COLOR_GREEN,
            Trend::Down => COLOR_RED,
            Trend::Flat => COLOR_GRAY,
        };

        let fields = vec![
            EmbedField::new(
                format!(
                    "Highest Price Target{}",
                    trend(current.highest, previous.highest).arrow()
                ),
                current_previous(current.highest, previous.highest),
            ),
            EmbedField::new(
                format!(
                    "Lowest Price Target{}",
                    trend(current.lowest, previous.lowest).arrow()
                ),
                current_previous(current.lowest, previous.lowest),
            ),
            EmbedField::new(
                "Average Price Target",
                current_previous(Some(current.average), Some(previous.average)),
            ),
        ];

        Self::embed(
            format!("{} ({})", data.ticker.company_name, data.ticker.symbol),
            color,
            format!("Current Price: ${}", data.ticker.price),
            fields,
        )
    }

    /// Short one-line form, used in logs and plain-text fallbacks.
    pub fn summary_line(symbol: &str, rating: &RatingSummary) -> String {
        format!(
            "{}: high {} / low {} / avg {}",
            symbol,
            dollars(rating.highest),
            dollars(rating.lowest),
            dollars(Some(rating.average))
        )
    }
}

fn command_fields() -> Vec<EmbedField> {
    vec![
        EmbedField::new("Commands", "`pt!rating`, `pt!help`"),
        EmbedField::new(
            "__pt!rating__",
            "Request the current lowest, highest, and average price targets provided by various analysts",
        ),
        EmbedField::new(
            "__pt!help__",
            "Display the help menu to view all available commands",
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    fn arrow(self) -> &'static str {
        match self {
            Trend::Up => ARROW_UP,
            Trend::Down => ARROW_DOWN,
            Trend::Flat => "",
        }
    }
}

fn trend(current: Option<f64>, previous: Option<f64>) -> Trend {
    match (current, previous) {
        (Some(c), Some(p)) if c > p => Trend::Up,
        (Some(c), Some(p)) if c < p => Trend::Down,
        _ => Trend::Flat,
    }
}

fn dollars(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", v),
        None => "N/A".to_string(),
    }
}

fn current_previous(current: Option<f64>, previous: Option<f64>) -> String {
    format!("Current: {}\nPrevious: {}", dollars(current), dollars(previous))
}
