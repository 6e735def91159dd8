use super::VersionedConfig;
use crate::catalog::ActivityTypeDescriptor;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "\
A roleplay puts the user inside a scenario with one or more AI characters. Give \
the user concrete objectives that can only be met by applying the concept. Keep \
each character's private motivation hidden from the user.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleplaySetting {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCharacterInfo {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivateCharacterInfo {
    pub personality: String,
    pub motivation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoleplayCharacter {
    pub public: PublicCharacterInfo,
    pub private: PrivateCharacterInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCharacter {
    pub objectives: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_information: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleplayConfigV0 {
    pub setting: RoleplaySetting,
    pub characters: Vec<RoleplayCharacter>,
    pub user_character: UserCharacter,
}

impl VersionedConfig for RoleplayConfigV0 {
    const TYPE: &'static str = "roleplay";
    const VERSION: &'static str = "0.0.0";
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleplayResult {
    pub objectives_met: Vec<String>,
    pub feedback: String,
}

pub fn descriptor() -> ActivityTypeDescriptor {
    ActivityTypeDescriptor::new(RoleplayConfigV0::TYPE)
        .with_version::<RoleplayConfigV0>()
        .with_result::<RoleplayResult>()
        .with_instructions(INSTRUCTIONS)
}
