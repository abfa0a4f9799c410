use inkflow_model::{CompletionRequest, Role, Turn};
use serde::{Deserialize, Serialize};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    role: &'static str,
    content: Content,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ImageUrl {
    url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &CompletionRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: req.model.clone(),
        messages: req.turns.iter().map(create_message).collect(),
    }
}

fn create_message(turn: &Turn) -> Message {
    let role = match turn.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let content = if turn.images.is_empty() {
        Content::Text(turn.content.clone())
    } else {
        // Attachments force the array form of the content field.
        let mut parts = vec![ContentPart::Text {
            text: turn.content.clone(),
        }];
        parts.extend(turn.images.iter().map(|a| ContentPart::ImageUrl {
            image_url: ImageUrl { url: a.url.clone() },
        }));
        Content::Parts(parts)
    };
    Message { role, content }
}

#[cfg(test)]
mod tests {
    use inkflow_model::{Attachment, Message as ChatMessage};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let messages = [
            ChatMessage::system("You are a helpful assistant."),
            ChatMessage::user("Hello"),
        ];
        let req = CompletionRequest::from_messages("gpt-5.2", &messages);
        let serialized = serde_json::to_value(create_request(&req)).unwrap();
        assert_eq!(
            serialized,
            json!({
                "model": "gpt-5.2",
                "messages": [
                    {
                        "role": "system",
                        "content": "You are a helpful assistant."
                    },
                    { "role": "user", "content": "Hello" },
                ]
            })
        );
    }

    #[test]
    fn test_images_use_content_parts() {
        let messages = [ChatMessage::user("What is in this picture?")
            .with_images(vec![Attachment {
                url: "https://example.com/cat.png".to_owned(),
                file_name: Some("cat.png".to_owned()),
            }])];
        let req = CompletionRequest::from_messages("gpt-5.2", &messages);
        let serialized = serde_json::to_value(create_request(&req)).unwrap();
        assert_eq!(
            serialized["messages"][0],
            json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "What is in this picture?" },
                    {
                        "type": "image_url",
                        "image_url": { "url": "https://example.com/cat.png" }
                    },
                ]
            })
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [{
                "message": { "content": "Hi there!" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 9, "completion_tokens": 3 }
        });
        let completion: ChatCompletion =
            serde_json::from_value(body).unwrap();
        assert_eq!(
            completion.choices[0].message.content.as_deref(),
            Some("Hi there!")
        );
        assert_eq!(completion.usage.unwrap().completion_tokens, 3);
    }
}
