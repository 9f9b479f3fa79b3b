//! Agent archetypes: data-driven tuning plus the attack each kind is bound to

use std::collections::HashSet;

use ashfall_core::{Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, AgentRig};
use crate::context::AgentBody;
use crate::error::{AiError, StrategyConfigError};
use crate::strategy::{
    AttackStrategy, ChargeConfig, ChargeDash, MeleeConfig, MeleeStrike, RangedConfig, RangedProjectile,
};

/// Which strategy an archetype is bound to, with its tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackProfile {
    Melee(MeleeConfig),
    Charge(ChargeConfig),
    Ranged(RangedConfig),
}

impl AttackProfile {
    pub fn kind(&self) -> &'static str {
        match self {
            AttackProfile::Melee(_) => "melee",
            AttackProfile::Charge(_) => "charge",
            AttackProfile::Ranged(_) => "ranged",
        }
    }

    pub fn validate(&self) -> Result<(), StrategyConfigError> {
        match self {
            AttackProfile::Melee(config) => config.validate(),
            AttackProfile::Charge(config) => config.validate(),
            AttackProfile::Ranged(config) => config.validate(),
        }
    }

    /// A fresh strategy instance, owned by exactly one agent
    pub fn build(&self) -> Box<dyn AttackStrategy> {
        match self {
            AttackProfile::Melee(config) => Box::new(MeleeStrike::new(config.clone())),
            AttackProfile::Charge(config) => Box::new(ChargeDash::new(config.clone())),
            AttackProfile::Ranged(config) => Box::new(RangedProjectile::new(config.clone())),
        }
    }
}

/// One kind of enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Archetype {
    pub name: String,
    pub movement_speed: f32,
    pub rotation_speed: f32,
    pub detection_radius: f32,
    pub chase_range: f32,
    pub chase_speed_fraction: f32,
    pub repath_interval: f32,
    /// Used only when `attack` is absent
    pub fallback_attack_range: f32,
    pub fallback_cooldown: f32,
    pub attack: Option<AttackProfile>,
}

impl Default for Archetype {
    fn default() -> Self {
        let body = AgentBody::default();
        Self {
            name: String::new(),
            movement_speed: body.movement_speed,
            rotation_speed: body.rotation_speed,
            detection_radius: body.detection_radius,
            chase_range: body.chase_range,
            chase_speed_fraction: body.chase_speed_fraction,
            repath_interval: body.repath_interval,
            fallback_attack_range: body.fallback_attack_range,
            fallback_cooldown: body.fallback_cooldown,
            attack: None,
        }
    }
}

impl Archetype {
    pub fn new(name: impl Into<String>, attack: Option<AttackProfile>) -> Self {
        Self {
            name: name.into(),
            attack,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), AiError> {
        let invalid = |reason: String| AiError::InvalidArchetype {
            name: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if self.movement_speed <= 0.0 || self.rotation_speed <= 0.0 {
            return Err(invalid("movement_speed and rotation_speed must be positive".into()));
        }
        if self.detection_radius <= 0.0 {
            return Err(invalid(format!("detection_radius must be positive, got {}", self.detection_radius)));
        }
        if self.chase_range < self.detection_radius {
            return Err(invalid(format!(
                "chase_range {} is shorter than detection_radius {}",
                self.chase_range, self.detection_radius
            )));
        }
        if !(self.chase_speed_fraction > 0.0 && self.chase_speed_fraction <= 1.0) {
            return Err(invalid(format!(
                "chase_speed_fraction must be within (0, 1], got {}",
                self.chase_speed_fraction
            )));
        }
        if self.repath_interval <= 0.0 {
            return Err(invalid(format!("repath_interval must be positive, got {}", self.repath_interval)));
        }
        if self.fallback_attack_range < 0.0 || self.fallback_cooldown < 0.0 {
            return Err(invalid("fallback range and cooldown must be non-negative".into()));
        }
        if let Some(attack) = &self.attack {
            attack.validate().map_err(|source| AiError::InvalidAttack {
                name: self.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn body_at(&self, position: Vec3) -> AgentBody {
        AgentBody {
            transform: Transform::from_position(position),
            movement_speed: self.movement_speed,
            movement_speed_modifier: 0.0,
            rotation_speed: self.rotation_speed,
            detection_radius: self.detection_radius,
            chase_range: self.chase_range,
            fallback_attack_range: self.fallback_attack_range,
            fallback_cooldown: self.fallback_cooldown,
            chase_speed_fraction: self.chase_speed_fraction,
            repath_interval: self.repath_interval,
        }
    }

    /// Build an agent of this kind, binding its strategy now
    pub fn instantiate(&self, id: AgentId, position: Vec3, rig: AgentRig) -> Agent {
        let strategy = self.attack.as_ref().map(AttackProfile::build);
        Agent::new(id, self.name.clone(), self.body_at(position), strategy, rig)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "archetype")]
    archetypes: Vec<Archetype>,
}

/// Validated set of archetypes, looked up by name
#[derive(Debug, Clone)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Archetype>,
}

impl ArchetypeCatalog {
    pub fn from_archetypes(archetypes: Vec<Archetype>) -> Result<Self, AiError> {
        let mut seen = HashSet::new();
        for archetype in &archetypes {
            archetype.validate()?;
            if !seen.insert(archetype.name.as_str()) {
                return Err(AiError::DuplicateArchetype(archetype.name.clone()));
            }
        }
        Ok(Self { archetypes })
    }

    /// Parse `[[archetype]]` tables
    pub fn from_toml_str(source: &str) -> Result<Self, AiError> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::from_archetypes(file.archetypes)
    }

    /// grunt (melee), brute (charge), archer (ranged), and husk (no attack)
    pub fn builtin() -> Self {
        let archer = Archetype {
            detection_radius: 14.0,
            chase_range: 18.0,
            ..Archetype::new("archer", Some(AttackProfile::Ranged(RangedConfig::default())))
        };
        let brute = Archetype {
            movement_speed: 3.0,
            rotation_speed: 5.0,
            ..Archetype::new("brute", Some(AttackProfile::Charge(ChargeConfig::default())))
        };
        Self {
            archetypes: vec![
                Archetype::new("grunt", Some(AttackProfile::Melee(MeleeConfig::default()))),
                brute,
                archer,
                Archetype::new("husk", None),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Archetype, AiError> {
        self.get(name)
            .ok_or_else(|| AiError::UnknownArchetype(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.archetypes.iter().map(|a| a.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

impl Default for ArchetypeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = ArchetypeCatalog::builtin();
        let catalog = ArchetypeCatalog::from_archetypes(builtin.iter().cloned().collect()).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["grunt", "brute", "archer", "husk"]);
        assert!(catalog.get("husk").unwrap().attack.is_none());
    }

    #[test]
    fn test_parse_tagged_attack_with_defaults() {
        let catalog = ArchetypeCatalog::from_toml_str(
            r#"
            [[archetype]]
            name = "lancer"
            movement_speed = 4.0

            [archetype.attack]
            kind = "charge"
            max_charge_distance = 4.0
            "#,
        )
        .unwrap();

        let lancer = catalog.require("lancer").unwrap();
        assert_eq!(lancer.movement_speed, 4.0);
        assert_eq!(lancer.detection_radius, 10.0);
        match &lancer.attack {
            Some(AttackProfile::Charge(config)) => {
                assert_eq!(config.max_charge_distance, 4.0);
                assert_eq!(config.telegraph, 0.3);
            }
            other => panic!("expected charge, got {other:?}"),
        }
    }

    #[test]
    fn test_shipped_catalog_parses() {
        let catalog = ArchetypeCatalog::from_toml_str(include_str!("../../../config/archetypes.toml")).unwrap();
        for name in ["grunt", "brute", "archer", "husk"] {
            assert!(catalog.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_rejects_chase_shorter_than_detection() {
        let result = ArchetypeCatalog::from_toml_str(
            r#"
            [[archetype]]
            name = "myopic"
            detection_radius = 10.0
            chase_range = 5.0
            "#,
        );
        assert!(matches!(result, Err(AiError::InvalidArchetype { .. })));
    }

    #[test]
    fn test_rejects_duplicates_and_bad_strategy() {
        let dup = ArchetypeCatalog::from_archetypes(vec![Archetype::new("a", None), Archetype::new("a", None)]);
        assert!(matches!(dup, Err(AiError::DuplicateArchetype(name)) if name == "a"));

        let bad = Archetype::new(
            "slow",
            Some(AttackProfile::Ranged(RangedConfig {
                windup: 5.0,
                ..Default::default()
            })),
        );
        assert!(matches!(
            bad.validate(),
            Err(AiError::InvalidAttack {
                ref name,
                source: StrategyConfigError::OutOfOrder { strategy: "ranged", .. },
            }) if name == "slow"
        ));
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let result = ArchetypeCatalog::from_toml_str(
            r#"
            [[archetype]]
            name = "wizard"
            [archetype.attack]
            kind = "fireball"
            "#,
        );
        assert!(matches!(result, Err(AiError::Parse(_))));
        assert!(matches!(
            ArchetypeCatalog::builtin().require("wizard"),
            Err(AiError::UnknownArchetype(_))
        ));
    }

    #[test]
    fn test_instantiate_binds_strategy() {
        let catalog = ArchetypeCatalog::builtin();
        let agent = catalog
            .require("archer")
            .unwrap()
            .instantiate(AgentId(3), Vec3::new(1.0, 0.0, 2.0), AgentRig::headless());
        assert_eq!(agent.strategy().map(|s| s.name()), Some("ranged"));
        assert_eq!(agent.body().detection_radius, 14.0);
        assert_eq!(agent.position(), Vec3::new(1.0, 0.0, 2.0));
    }
}
