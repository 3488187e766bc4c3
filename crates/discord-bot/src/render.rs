use ratings_core::Message as ChatMessage;
use serenity::builder::{CreateEmbed, CreateMessage};

pub fn create_message(message: &ChatMessage) -> CreateMessage {
    match message {
        ChatMessage::PlainText(text) => CreateMessage::default().content(text.clone()),
        ChatMessage::Embed { title, color, description, fields } => {
            let embed = fields.iter().fold(
                CreateEmbed::new()
                    .title(title.clone())
                    .color(*color)
                    .description(description.clone()),
                |embed, f| embed.field(f.name.clone(), f.value.clone(), f.inline),
            );
            CreateMessage::default().embed(embed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let json = serde_json::to_value(create_message(&ChatMessage::text("Usage: `pt!rating <TICKER>`"))).unwrap();
        assert_eq!(json["content"], "Usage: `pt!rating <TICKER>`");
    }

    #[test]
    fn test_embed() {
        let json = serde_json::to_value(create_message(&ChatMessage::help())).unwrap();
        let embed = &json["embeds"][0];
        assert_eq!(embed["title"], "Help Menu");
        assert_eq!(embed["fields"].as_array().unwrap().len(), 3);
        assert_eq!(embed["fields"][0]["name"], "Commands");
    }
}
