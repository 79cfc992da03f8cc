//! Built-in robot listing the available commands.

use async_trait::async_trait;

use crate::payload::Payload;
use crate::registry::RobotRegistry;
use crate::Robot;

/// Command the help robot is registered under by default.
pub const HELP_COMMAND: &str = "c";

/// Lists every command with its description.
///
/// The listing is captured when the robot is built, so register it after all
/// other robots.
pub struct HelpRobot {
    listing: String,
}

impl HelpRobot {
    /// Build the listing from a populated registry.
    #[must_use]
    pub fn from_registry(registry: &RobotRegistry) -> Self {
        let listing = registry
            .descriptions()
            .into_iter()
            .map(|(command, description)| format!("/{command} - {description}"))
            .collect::<Vec<_>>()
            .join("\n");

        Self { listing }
    }
}

#[async_trait]
impl Robot for HelpRobot {
    async fn run(&self, _payload: &Payload) -> String {
        if self.listing.is_empty() {
            "No robots registered yet.".to_string()
        } else {
            self.listing.clone()
        }
    }

    fn description(&self) -> String {
        "List available commands.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Named(&'static str);

    #[async_trait]
    impl Robot for Named {
        async fn run(&self, _payload: &Payload) -> String {
            String::new()
        }

        fn description(&self) -> String {
            self.0.to_string()
        }
    }

    #[tokio::test]
    async fn test_lists_commands_sorted() {
        let mut registry = RobotRegistry::new();
        registry.register("weather", Arc::new(Named("Show the weather.")));
        registry.register("download-prometheus", Arc::new(Named("Fetch a tile.")));

        let help = HelpRobot::from_registry(&registry);
        let listing = help.run(&Payload::default()).await;

        assert_eq!(
            listing,
            "/download-prometheus - Fetch a tile.\n/weather - Show the weather."
        );
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let help = HelpRobot::from_registry(&RobotRegistry::new());
        assert_eq!(help.run(&Payload::default()).await, "No robots registered yet.");
    }
}
