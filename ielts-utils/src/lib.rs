//! Wire types shared by the IELTS preparation frontend and the HTTP API it talks to.

pub mod analysis;
pub mod chat;
pub mod diagnostic;
pub mod practice;
pub mod progress;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four IELTS skills. The derived `Ord` follows the diagnostic order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Listening,
    Reading,
    Writing,
    Speaking,
}

impl Skill {
    /// The order in which the diagnostic walks the skills.
    pub const ORDER: [Skill; 4] = [
        Skill::Listening,
        Skill::Reading,
        Skill::Writing,
        Skill::Speaking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Listening => "listening",
            Skill::Reading => "reading",
            Skill::Writing => "writing",
            Skill::Speaking => "speaking",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Skill::Listening => "Listening",
            Skill::Reading => "Reading",
            Skill::Writing => "Writing",
            Skill::Speaking => "Speaking",
        }
    }

    pub fn next(self) -> Option<Skill> {
        let position = Self::ORDER.iter().position(|skill| *skill == self)?;
        Self::ORDER.get(position + 1).copied()
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill: {0:?}")]
pub struct UnknownSkill(pub String);

impl FromStr for Skill {
    type Err = UnknownSkill;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| UnknownSkill(s.to_string()))
    }
}

/// A level per skill, as used for current and target levels.
/// Missing entries are `None` and serialize as `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub struct SkillLevels {
    pub listening: Option<f64>,
    pub reading: Option<f64>,
    pub writing: Option<f64>,
    pub speaking: Option<f64>,
}

impl SkillLevels {
    pub fn get(&self, skill: Skill) -> Option<f64> {
        match skill {
            Skill::Listening => self.listening,
            Skill::Reading => self.reading,
            Skill::Writing => self.writing,
            Skill::Speaking => self.speaking,
        }
    }

    pub fn set(&mut self, skill: Skill, level: Option<f64>) {
        let slot = match skill {
            Skill::Listening => &mut self.listening,
            Skill::Reading => &mut self.reading,
            Skill::Writing => &mut self.writing,
            Skill::Speaking => &mut self.speaking,
        };
        *slot = level;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Skill, Option<f64>)> + '_ {
        Skill::ORDER.into_iter().map(|skill| (skill, self.get(skill)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_order_walks_every_skill_once() {
        let mut visited = vec![Skill::ORDER[0]];
        while let Some(next) = visited.last().and_then(|skill| skill.next()) {
            visited.push(next);
        }
        assert_eq!(visited, Skill::ORDER.to_vec());
    }

    #[test]
    fn test_skill_wire_names() {
        assert_eq!(serde_json::to_string(&Skill::Writing).unwrap(), "\"writing\"");
        assert_eq!("speaking".parse::<Skill>(), Ok(Skill::Speaking));
        assert!("maths".parse::<Skill>().is_err());
    }

    #[test]
    fn test_skill_levels_missing_fields_are_none() {
        let levels: SkillLevels =
            serde_json::from_str(r#"{"listening": 6.5, "reading": 7}"#).unwrap();
        assert_eq!(levels.get(Skill::Listening), Some(6.5));
        assert_eq!(levels.get(Skill::Reading), Some(7.0));
        assert_eq!(levels.get(Skill::Writing), None);

        let json = serde_json::to_value(levels).unwrap();
        assert_eq!(json["speaking"], serde_json::Value::Null);
    }
}
