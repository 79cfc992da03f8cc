//! Command to robot mapping.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;

use crate::payload::Payload;
use crate::Robot;

/// Robots keyed by the command that invokes them.
///
/// A command may be served by several robots. They run in the order they
/// were registered.
#[derive(Default, Clone)]
pub struct RobotRegistry {
    robots: BTreeMap<String, Vec<Arc<dyn Robot>>>,
}

impl RobotRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a robot for a command.
    pub fn register(&mut self, command: impl Into<String>, robot: Arc<dyn Robot>) {
        let command = command.into();
        debug!(command = %command, "Registered robot");
        self.robots.entry(command).or_default().push(robot);
    }

    /// Robots registered for a command, empty when there are none.
    #[must_use]
    pub fn robots(&self, command: &str) -> &[Arc<dyn Robot>] {
        self.robots.get(command).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.robots.keys().map(String::as_str)
    }

    /// `(command, description)` for every registered robot, sorted by command.
    #[must_use]
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.robots
            .iter()
            .flat_map(|(command, robots)| {
                robots
                    .iter()
                    .map(move |robot| (command.clone(), robot.description()))
            })
            .collect()
    }

    /// Run every robot registered for `payload.robot`.
    ///
    /// Returns `None` when no robot handles the command. Otherwise each reply
    /// is placed on its own line and the joined text is trimmed.
    pub async fn dispatch(&self, payload: &Payload) -> Option<String> {
        let robots = self.robots(&payload.robot);
        if robots.is_empty() {
            return None;
        }

        let mut response = String::new();
        for robot in robots {
            let reply = robot.run(payload).await;
            let _ = write!(response, "\n{reply}");
        }

        Some(response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl Robot for Echo {
        async fn run(&self, payload: &Payload) -> String {
            format!("{} {}", self.0, payload.text)
        }

        fn description(&self) -> String {
            format!("Echoes with {}", self.0)
        }
    }

    fn payload(robot: &str, text: &str) -> Payload {
        Payload {
            robot: robot.to_string(),
            text: text.to_string(),
            ..Payload::default()
        }
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let registry = RobotRegistry::new();
        assert!(registry.dispatch(&payload("nope", "")).await.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_concatenates_in_registration_order() {
        let mut registry = RobotRegistry::new();
        registry.register("echo", Arc::new(Echo("first")));
        registry.register("echo", Arc::new(Echo("second")));

        let response = registry.dispatch(&payload("echo", "hi")).await;
        assert_eq!(response.as_deref(), Some("first hi\nsecond hi"));
    }

    #[tokio::test]
    async fn test_dispatch_trims_whitespace() {
        let mut registry = RobotRegistry::new();
        registry.register("echo", Arc::new(Echo("  padded")));

        let response = registry.dispatch(&payload("echo", "")).await;
        assert_eq!(response.as_deref(), Some("padded"));
    }

    #[test]
    fn test_descriptions_sorted_by_command() {
        let mut registry = RobotRegistry::new();
        registry.register("zeta", Arc::new(Echo("z")));
        registry.register("alpha", Arc::new(Echo("a")));

        let descriptions = registry.descriptions();
        assert_eq!(
            descriptions,
            vec![
                ("alpha".to_string(), "Echoes with a".to_string()),
                ("zeta".to_string(), "Echoes with z".to_string()),
            ]
        );
        assert_eq!(registry.commands().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_robots_empty_for_unknown() {
        let registry = RobotRegistry::new();
        assert!(registry.robots("missing").is_empty());
    }
}
