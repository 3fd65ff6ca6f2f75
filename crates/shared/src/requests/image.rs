use serde::{Deserialize, Serialize};
use stampalooza_domain::Selection;

/// Query of the on-demand `GET /generate-ice-cream-image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationQuery {
    pub player: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ImageGenerationQuery {
    /// Query pairs in wire order
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("player", self.player.as_str())];
        if let Some(session_id) = &self.session_id {
            pairs.push(("session_id", session_id.as_str()));
        }
        pairs
    }
}

/// Body of the direct `POST /generate-ice-cream-image`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationRequest {
    pub selections: Vec<Selection>,
    pub player_name: String,
    pub style: String,
    pub size: String,
}

impl ImageGenerationRequest {
    pub fn new(player_name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Self {
            selections,
            player_name: player_name.into(),
            style: "realistic".to_string(),
            size: "1024x1024".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_pair_only_when_present() {
        let mut query = ImageGenerationQuery {
            player: "Bo".into(),
            session_id: None,
        };
        assert_eq!(query.pairs(), vec![("player", "Bo")]);
        query.session_id = Some("s-1".into());
        assert_eq!(query.pairs(), vec![("player", "Bo"), ("session_id", "s-1")]);
    }

    #[test]
    fn direct_request_uses_backend_defaults() {
        let request = ImageGenerationRequest::new("Amy", vec![Selection::Skip]);
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["playerName"], "Amy");
        assert_eq!(json["style"], "realistic");
        assert_eq!(json["size"], "1024x1024");
    }
}
