//! Swap request payload types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /swap-requests`.
///
/// Offers the assignment `assignment_id` to any of `requested_user_ids`.
/// Duplicates are allowed and the order is kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapRequestCreate {
    pub assignment_id: i64,
    pub requested_user_ids: Vec<i64>,
}

/// The backend's confirmation of a newly created swap request.
///
/// Only `id` is guaranteed; the remaining fields are filled when the
/// backend echoes the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequestCreated {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub requested_user_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_shape() {
        let body = SwapRequestCreate {
            assignment_id: 5,
            requested_user_ids: vec![2, 3, 3],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"assignment_id": 5, "requested_user_ids": [2, 3, 3]})
        );
    }

    #[test]
    fn test_created_accepts_bare_id() {
        let created: SwapRequestCreated = serde_json::from_str(r#"{"id": 17}"#).unwrap();
        assert_eq!(created.id, 17);
        assert!(created.requested_user_ids.is_empty());
        assert_eq!(created.status, None);
    }
}
