//! Architectural kinds and confidence levels.
//!
//! Classifiers and front ends speak in string tags; those tags are parsed
//! into [`ElementKind`] exactly once, here, and never compared as strings
//! again downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outbound port flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrivenPortKind {
    Repository,
    Gateway,
    EventPublisher,
    Notification,
    Other,
}

impl DrivenPortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "REPOSITORY",
            Self::Gateway => "GATEWAY",
            Self::EventPublisher => "EVENT_PUBLISHER",
            Self::Notification => "NOTIFICATION",
            Self::Other => "OTHER",
        }
    }
}

/// Candidate kind proposed by classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    AggregateRoot,
    Entity,
    ValueObject,
    Identifier,
    DomainEvent,
    DomainService,
    DrivingPort,
    DrivenPort(DrivenPortKind),
    ApplicationService,
    CommandHandler,
    QueryHandler,
    Unclassified,
}

impl ElementKind {
    pub const REPOSITORY: ElementKind = ElementKind::DrivenPort(DrivenPortKind::Repository);

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AggregateRoot => "AGGREGATE_ROOT",
            Self::Entity => "ENTITY",
            Self::ValueObject => "VALUE_OBJECT",
            Self::Identifier => "IDENTIFIER",
            Self::DomainEvent => "DOMAIN_EVENT",
            Self::DomainService => "DOMAIN_SERVICE",
            Self::DrivingPort => "DRIVING_PORT",
            Self::DrivenPort(DrivenPortKind::Other) => "DRIVEN_PORT",
            Self::DrivenPort(sub) => sub.as_str(),
            Self::ApplicationService => "APPLICATION_SERVICE",
            Self::CommandHandler => "COMMAND_HANDLER",
            Self::QueryHandler => "QUERY_HANDLER",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::AggregateRoot
                | Self::Entity
                | Self::ValueObject
                | Self::Identifier
                | Self::DomainEvent
                | Self::DomainService
        )
    }

    pub fn is_port(&self) -> bool {
        matches!(self, Self::DrivingPort | Self::DrivenPort(_))
    }

    pub fn is_application(&self) -> bool {
        matches!(
            self,
            Self::ApplicationService | Self::CommandHandler | Self::QueryHandler
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = String;

    /// Accepts canonical tags plus the aliases older front ends emit
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_uppercase().as_str() {
            "AGGREGATE_ROOT" | "AGGREGATE" => Self::AggregateRoot,
            "ENTITY" => Self::Entity,
            "VALUE_OBJECT" => Self::ValueObject,
            "IDENTIFIER" => Self::Identifier,
            "DOMAIN_EVENT" | "EXTERNALIZED_EVENT" => Self::DomainEvent,
            "DOMAIN_SERVICE" => Self::DomainService,
            "DRIVING_PORT" | "USE_CASE" => Self::DrivingPort,
            "DRIVEN_PORT" | "GENERIC" => Self::DrivenPort(DrivenPortKind::Other),
            "REPOSITORY" => Self::DrivenPort(DrivenPortKind::Repository),
            "GATEWAY" => Self::DrivenPort(DrivenPortKind::Gateway),
            "EVENT_PUBLISHER" => Self::DrivenPort(DrivenPortKind::EventPublisher),
            "NOTIFICATION" => Self::DrivenPort(DrivenPortKind::Notification),
            "APPLICATION_SERVICE" | "INBOUND_ONLY" | "OUTBOUND_ONLY" | "SAGA" => {
                Self::ApplicationService
            }
            "COMMAND_HANDLER" => Self::CommandHandler,
            "QUERY_HANDLER" => Self::QueryHandler,
            "UNCLASSIFIED" => Self::Unclassified,
            other => return Err(format!("unknown element kind '{other}'")),
        };
        Ok(kind)
    }
}

/// How sure a criterion is of its proposal, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    Explicit,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Explicit => "EXPLICIT",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_order() {
        assert!(ConfidenceLevel::Explicit > ConfidenceLevel::High);
        assert!(ConfidenceLevel::High > ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium > ConfidenceLevel::Low);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("EXTERNALIZED_EVENT".parse(), Ok(ElementKind::DomainEvent));
        assert_eq!("saga".parse(), Ok(ElementKind::ApplicationService));
        assert_eq!(
            "GENERIC".parse(),
            Ok(ElementKind::DrivenPort(DrivenPortKind::Other))
        );
        assert_eq!("REPOSITORY".parse(), Ok(ElementKind::REPOSITORY));
        assert!("PLUGIN".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_tags_round_trip_through_display() {
        for kind in [
            ElementKind::AggregateRoot,
            ElementKind::DrivenPort(DrivenPortKind::Gateway),
            ElementKind::DrivenPort(DrivenPortKind::Other),
            ElementKind::QueryHandler,
        ] {
            assert_eq!(kind.to_string().parse::<ElementKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_layer_predicates() {
        assert!(ElementKind::Identifier.is_domain());
        assert!(ElementKind::REPOSITORY.is_port());
        assert!(ElementKind::CommandHandler.is_application());
        assert!(!ElementKind::Unclassified.is_domain());
    }
}
