//! Pure reconciliation planner
//!
//! Decides the next due action from flag state alone. The actor executes
//! actions and mutates flags; the planner never touches collaborators, so
//! the dispatch order is unit-testable without a live host.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::state::AgentState;

/// One reconciliation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Install the exporter snap
    InstallExporter,
    /// Compare fingerprints and decide whether to re-render
    CheckReconfig,
    /// Render the exporter configuration file
    RenderConfig,
    /// Start or restart the exporter service
    RestartExporter,
    /// Advertise the exporter as a scrape target
    ConfigureScrapeTarget,
    /// Register the NRPE health check
    ConfigureNrpe,
    /// Remove the NRPE health check
    RemoveNrpe,
    /// Push dashboards to the registry
    PublishDashboards,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::InstallExporter => "install-exporter",
            Action::CheckReconfig => "check-reconfig",
            Action::RenderConfig => "render-config",
            Action::RestartExporter => "restart-exporter",
            Action::ConfigureScrapeTarget => "configure-scrape-target",
            Action::ConfigureNrpe => "configure-nrpe",
            Action::RemoveNrpe => "remove-nrpe",
            Action::PublishDashboards => "publish-dashboards",
        };
        write!(f, "{name}")
    }
}

/// Decide the next due action, skipping actions already fired this dispatch
///
/// Every action either clears the marker that made it due or is guarded by
/// the fired-set, so repeated calls reach a fixpoint within one pass over
/// the action list.
#[must_use]
pub fn next_action(state: &AgentState, fired: &HashSet<Action>) -> Option<Action> {
    let flags = &state.flags;
    let relations = &state.relations;

    let candidates = [
        (Action::InstallExporter, !flags.installed),
        (
            Action::CheckReconfig,
            flags.installed && flags.do_check_reconfig,
        ),
        (
            Action::RenderConfig,
            flags.installed && flags.do_reconfig_yaml,
        ),
        (Action::RestartExporter, flags.do_restart),
        (
            Action::ConfigureScrapeTarget,
            flags.started && relations.prometheus && !flags.scrape_configured,
        ),
        (Action::ConfigureNrpe, relations.nrpe && !flags.nrpe_configured),
        (Action::RemoveNrpe, !relations.nrpe && flags.nrpe_configured),
        (
            Action::PublishDashboards,
            relations.dashboards && flags.publish_dashboards,
        ),
    ];

    candidates
        .into_iter()
        .find(|(action, due)| *due && !fired.contains(action))
        .map(|(action, _)| action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Relation;

    fn drain(state: &mut AgentState, apply: impl Fn(&mut AgentState, Action)) -> Vec<Action> {
        let mut fired = HashSet::new();
        let mut actions = Vec::new();
        while let Some(action) = next_action(state, &fired) {
            fired.insert(action);
            apply(state, action);
            actions.push(action);
        }
        actions
    }

    // Flag mutations the real handlers perform, without side effects
    fn apply(state: &mut AgentState, action: Action) {
        let flags = &mut state.flags;
        match action {
            Action::InstallExporter => {
                flags.installed = true;
                flags.do_check_reconfig = true;
            }
            Action::CheckReconfig => {
                flags.do_reconfig_yaml = true;
                flags.do_check_reconfig = false;
            }
            Action::RenderConfig => {
                flags.do_restart = true;
                flags.do_reconfig_yaml = false;
            }
            Action::RestartExporter => {
                flags.started = true;
                flags.do_restart = false;
            }
            Action::ConfigureScrapeTarget => flags.scrape_configured = true,
            Action::ConfigureNrpe => flags.nrpe_configured = true,
            Action::RemoveNrpe => flags.nrpe_configured = false,
            Action::PublishDashboards => flags.publish_dashboards = false,
        }
    }

    #[test]
    fn test_fresh_state_runs_install_chain() {
        let mut state = AgentState::default();

        let actions = drain(&mut state, apply);

        assert_eq!(
            actions,
            vec![
                Action::InstallExporter,
                Action::CheckReconfig,
                Action::RenderConfig,
                Action::RestartExporter,
            ]
        );
        assert!(state.flags.installed);
        assert!(state.flags.started);
        assert!(!state.flags.do_restart);
    }

    #[test]
    fn test_steady_state_plans_nothing() {
        let mut state = AgentState::default();
        drain(&mut state, apply);

        let again = drain(&mut state, apply);

        assert!(again.is_empty());
    }

    #[test]
    fn test_nrpe_relation_toggles_check() {
        let mut state = AgentState::default();
        drain(&mut state, apply);

        state.relations.set(Relation::Nrpe, true);
        assert_eq!(drain(&mut state, apply), vec![Action::ConfigureNrpe]);

        state.relations.set(Relation::Nrpe, false);
        assert_eq!(drain(&mut state, apply), vec![Action::RemoveNrpe]);
    }

    #[test]
    fn test_scrape_target_waits_for_started_service() {
        let mut state = AgentState::default();
        state.relations.set(Relation::Prometheus, true);

        assert_eq!(
            next_action(&state, &HashSet::new()),
            Some(Action::InstallExporter)
        );

        drain(&mut state, apply);
        assert!(state.flags.scrape_configured);
    }

    #[test]
    fn test_fired_set_guarantees_termination() {
        // A handler that refuses to clear its marker (render with a broken
        // module list) must not spin the loop
        let mut state = AgentState::default();
        state.flags.installed = true;
        state.flags.do_reconfig_yaml = true;

        let actions = drain(&mut state, |_, _| {});

        assert_eq!(actions, vec![Action::RenderConfig]);
    }
}
