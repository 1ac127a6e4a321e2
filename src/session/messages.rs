use serde::{Deserialize, Serialize};

/// Structured text frames the client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Control { action: ControlAction },
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    /// Requests graceful termination of the session.
    Stop,
}

/// Messages the server pushes to the client. The discriminant is the
/// `type` field on the wire.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Interim hypothesis, superseded by the next partial or final.
    Partial { text: String },
    /// A reconciled, de-duplicated utterance.
    Final { text: String },
    /// Persistence completed; `key` identifies the stored object.
    Saved { key: String },
    /// Fatal or non-fatal fault description.
    Error { text: String },
}

/// Inbound traffic after the transport layer has classified the frame.
/// Binary frames carry raw PCM audio; text frames are parsed by the
/// session controller.
#[derive(Debug)]
pub enum Inbound {
    Audio(Vec<u8>),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_command_parses() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"control","action":"stop"}"#).unwrap();
        let ClientMessage::Control { action } = msg;
        assert_eq!(action, ControlAction::Stop);
    }

    #[test]
    fn unknown_control_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"control","action":"pause"}"#)
            .is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn server_messages_carry_type_tag() {
        let json = serde_json::to_string(&ServerMessage::Final {
            text: "hello there".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"final","text":"hello there"}"#);

        let json = serde_json::to_string(&ServerMessage::Saved {
            key: "a/b.txt".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"saved","key":"a/b.txt"}"#);
    }
}
