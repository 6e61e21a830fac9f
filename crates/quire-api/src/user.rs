use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use uuid::Uuid;

/// Author of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: SmolStr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_wire_format() {
        let tag = Tag {
            id: Uuid::parse_str("6f1c2a4e-9b3d-4c8e-a1f0-2d7b5e9c3a10").unwrap(),
            name: "rust".into(),
        };
        insta::assert_snapshot!(
            serde_json::to_string(&tag).unwrap(),
            @r#"{"id":"6f1c2a4e-9b3d-4c8e-a1f0-2d7b5e9c3a10","name":"rust"}"#
        );
    }

    #[test]
    fn test_user_without_profile_image() {
        let json = r#"{"id":"6f1c2a4e-9b3d-4c8e-a1f0-2d7b5e9c3a10","username":"mina"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "mina");
        assert!(user.profile_image.is_none());

        // Absent optional fields stay absent on the way back out.
        let out = serde_json::to_string(&user).unwrap();
        assert!(!out.contains("profileImage"));
    }
}
