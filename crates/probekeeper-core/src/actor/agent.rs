//! `AgentActor`: exporter deployment reconciliation
//!
//! One actor per host. The mailbox serializes hook events; each `Dispatch`
//! runs the planner to fixpoint and persists the flag state before
//! replying.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use kameo::actor::{ActorRef, WeakActorRef};
use kameo::error::ActorStopReason;
use kameo::message::{Context, Message};
use kameo::prelude::*;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use probekeeper_api::events::AgentEvent;
use probekeeper_api::status::WorkloadStatus;
use probekeeper_dash::archive;
use probekeeper_dash::traits::DashboardRegistry;
use probekeeper_monitor::traits::{CheckDef, HealthCheckAgent};
use probekeeper_pkg::traits::SnapInstaller;
use probekeeper_svc::traits::{Firewall, ScrapeTargetPublisher, ServiceManager};

use crate::config::{ConfigSnapshot, ExporterSettings};
use crate::error::CoreError;
use crate::message::{AgentStatusReport, Dispatch, DispatchOutcome, GetAgentStatus, HookEvent};
use crate::plan::{self, Action};
use crate::state::{AgentState, Flags, Relation};
use crate::store::StateStore;
use crate::{modules, render};

/// Shortname of the exporter's NRPE check
pub const NRPE_SHORTNAME: &str = "prometheus_blackbox_exporter_http";

/// Arguments for spawning an `AgentActor`
pub struct AgentActorArgs {
    /// Exporter identity and paths
    pub settings: ExporterSettings,
    /// State loaded from the store
    pub state: AgentState,
    /// Store the state persists to after each dispatch
    pub store: StateStore,
    /// Snap installer
    pub installer: Arc<dyn SnapInstaller>,
    /// Service manager
    pub services: Arc<dyn ServiceManager>,
    /// Firewall
    pub firewall: Arc<dyn Firewall>,
    /// Health check agent
    pub health_checks: Arc<dyn HealthCheckAgent>,
    /// Scrape target publisher
    pub scrape_targets: Arc<dyn ScrapeTargetPublisher>,
    /// Dashboard registry
    pub dashboards: Arc<dyn DashboardRegistry>,
    /// Event broadcast sender
    pub event_tx: broadcast::Sender<AgentEvent>,
}

/// Reconciler actor for the exporter deployment
pub struct AgentActor {
    settings: ExporterSettings,
    state: AgentState,
    store: StateStore,
    installer: Arc<dyn SnapInstaller>,
    services: Arc<dyn ServiceManager>,
    firewall: Arc<dyn Firewall>,
    health_checks: Arc<dyn HealthCheckAgent>,
    scrape_targets: Arc<dyn ScrapeTargetPublisher>,
    dashboards: Arc<dyn DashboardRegistry>,
    event_tx: broadcast::Sender<AgentEvent>,
}

impl AgentActor {
    /// Current flag state
    #[must_use]
    pub fn flags(&self) -> &Flags {
        &self.state.flags
    }

    /// Report and record a workload status
    fn set_status(&mut self, status: WorkloadStatus) {
        if self.state.status.as_ref() == Some(&status) {
            return;
        }

        info!(level = %status.level, message = %status.message, "workload status");
        self.state.status = Some(status.clone());
        let _ = self.event_tx.send(AgentEvent::StatusChanged { status });
    }

    /// Emit `FlagChanged` events for every flag that differs from `before`
    fn emit_flag_changes(&self, before: &Flags) {
        for (flag, set) in before.diff(&self.state.flags) {
            let _ = self.event_tx.send(AgentEvent::FlagChanged {
                flag: flag.to_string(),
                set,
            });
        }
    }

    fn persist(&self) -> Result<(), CoreError> {
        self.store.save(&self.state)
    }

    /// Fold a hook event into the flag state before planning
    async fn apply_event(&mut self, event: &HookEvent) {
        match event {
            HookEvent::Install | HookEvent::ConfigChanged | HookEvent::UpdateStatus => {}
            HookEvent::Upgrade => {
                self.set_status(WorkloadStatus::maintenance("agent upgrade in progress"));
                self.refresh_dashboards().await;
                self.state.flags.do_restart = true;
            }
            HookEvent::RelationJoined(relation) => {
                self.state.relations.set(*relation, true);
                if *relation == Relation::Dashboards {
                    self.state.flags.publish_dashboards = true;
                }
            }
            HookEvent::RelationChanged(relation) => {
                // Relation churn re-advertises the corresponding integration
                self.state.relations.set(*relation, true);
                match relation {
                    Relation::Nrpe => self.state.flags.nrpe_configured = false,
                    Relation::Prometheus => self.state.flags.scrape_configured = false,
                    Relation::Dashboards => self.state.flags.publish_dashboards = true,
                }
            }
            HookEvent::RelationDeparted(relation) => {
                self.state.relations.set(*relation, false);
                if *relation == Relation::Prometheus {
                    self.state.flags.scrape_configured = false;
                }
            }
        }
    }

    /// Extract the operator-supplied dashboard archive, if any
    ///
    /// Extraction failures keep the shipped dashboard set and are never
    /// fatal to the dispatch.
    async fn refresh_dashboards(&mut self) {
        let Some(resource) = self.settings.dashboard_resource.clone() else {
            debug!("no dashboards resource configured, keeping shipped set");
            return;
        };

        match archive::refresh_from_resource(&resource, &self.settings.dashboard_dir).await {
            Ok(count) => {
                info!(count, "dashboards refreshed from resource");
                self.state.flags.publish_dashboards = true;
            }
            Err(e) => {
                error!(error = %e, "dashboard resource extraction failed");
            }
        }
    }

    async fn run_action(
        &mut self,
        action: Action,
        snapshot: &ConfigSnapshot,
    ) -> Result<(), CoreError> {
        match action {
            Action::InstallExporter => self.install_exporter(snapshot).await,
            Action::CheckReconfig => {
                self.check_reconfig(snapshot);
                Ok(())
            }
            Action::RenderConfig => self.render_config(snapshot).await,
            Action::RestartExporter => self.restart_exporter().await,
            Action::ConfigureScrapeTarget => self.configure_scrape_target(snapshot).await,
            Action::ConfigureNrpe => self.configure_nrpe().await,
            Action::RemoveNrpe => self.remove_nrpe().await,
            Action::PublishDashboards => self.publish_dashboards().await,
        }
    }

    async fn install_exporter(&mut self, snapshot: &ConfigSnapshot) -> Result<(), CoreError> {
        self.set_status(WorkloadStatus::maintenance("installing exporter snap"));

        let snap = self
            .installer
            .install(&self.settings.snap_name, &snapshot.snap_channel)
            .await
            .map_err(|e| CoreError::Install(e.to_string()))?;

        info!(
            snap = %snap.name,
            version = %snap.version,
            channel = %snapshot.snap_channel,
            "exporter snap installed"
        );
        let _ = self.event_tx.send(AgentEvent::ExporterInstalled {
            snap: snap.name,
            channel: snapshot.snap_channel.clone(),
        });

        self.state.flags.installed = true;
        self.state.flags.do_check_reconfig = true;
        Ok(())
    }

    fn check_reconfig(&mut self, snapshot: &ConfigSnapshot) {
        let config_changed = self
            .state
            .fingerprints
            .data_changed("config", snapshot.canonical_bytes());

        // The candidate rendering is fingerprinted too, so renderer changes
        // trigger a rewrite even with an unchanged snapshot
        let render_changed = match modules::load_modules(&snapshot.modules) {
            Some(normalized) => self
                .state
                .fingerprints
                .data_changed("rendered-config", render::render_config(&normalized)),
            None => false,
        };

        if config_changed || render_changed {
            debug!(config_changed, render_changed, "configuration drift detected");
            self.state.flags.do_reconfig_yaml = true;
        }

        self.state.flags.do_check_reconfig = false;
    }

    async fn render_config(&mut self, snapshot: &ConfigSnapshot) -> Result<(), CoreError> {
        let Some(normalized) = modules::load_modules(&snapshot.modules) else {
            // Marker stays set; the next hook event retries with fresh config
            warn!("module list unparseable, keeping existing exporter configuration");
            return Ok(());
        };

        let rendered = render::render_config(&normalized);
        let path = self.settings.config_path.clone();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::ConfigWrite(e.to_string()))?;
        }
        tokio::fs::write(&path, &rendered)
            .await
            .map_err(|e| CoreError::ConfigWrite(e.to_string()))?;

        self.firewall
            .open_port(self.settings.port)
            .await
            .map_err(|e| CoreError::Firewall(e.to_string()))?;

        info!(path = %path.display(), "exporter configuration rendered");
        let _ = self.event_tx.send(AgentEvent::ConfigRendered {
            path: path.display().to_string(),
        });

        self.state.flags.do_restart = true;
        self.state.flags.do_reconfig_yaml = false;
        Ok(())
    }

    async fn restart_exporter(&mut self) -> Result<(), CoreError> {
        let unit = self.settings.service_unit.clone();

        let running = self
            .services
            .is_running(&unit)
            .await
            .map_err(|e| CoreError::Service(e.to_string()))?;

        if running {
            info!(unit = %unit, "restarting exporter, configuration changed");
            self.services
                .restart(&unit)
                .await
                .map_err(|e| CoreError::Service(e.to_string()))?;
            let _ = self
                .event_tx
                .send(AgentEvent::ServiceRestarted { unit: unit.clone() });
        } else {
            info!(unit = %unit, "starting exporter");
            self.services
                .start(&unit)
                .await
                .map_err(|e| CoreError::Service(e.to_string()))?;
            let _ = self
                .event_tx
                .send(AgentEvent::ServiceStarted { unit: unit.clone() });
        }

        self.set_status(WorkloadStatus::active("ready"));
        self.state.flags.started = true;
        self.state.flags.do_restart = false;
        Ok(())
    }

    async fn configure_scrape_target(
        &mut self,
        snapshot: &ConfigSnapshot,
    ) -> Result<(), CoreError> {
        self.scrape_targets
            .configure(&snapshot.hostname, self.settings.port)
            .await
            .map_err(|e| CoreError::ScrapeTarget(e.to_string()))?;

        let target = format!("{}:{}", snapshot.hostname, self.settings.port);
        info!(target = %target, "scrape target advertised");
        let _ = self
            .event_tx
            .send(AgentEvent::ScrapeTargetPublished { target });

        self.state.flags.scrape_configured = true;
        Ok(())
    }

    async fn configure_nrpe(&mut self) -> Result<(), CoreError> {
        if !self.health_checks.available().await {
            // Not an error: the flag stays clear and a later event retries
            self.set_status(WorkloadStatus::blocked("waiting for NRPE installation"));
            return Ok(());
        }

        self.set_status(WorkloadStatus::maintenance("configuring NRPE checks"));

        let check = CheckDef::new(
            NRPE_SHORTNAME,
            format!(
                "/usr/lib/nagios/plugins/check_http -I 127.0.0.1 -p {} -u /metrics",
                self.settings.port
            ),
            "Blackbox exporter HTTP check",
        );

        self.health_checks
            .add_check(&check)
            .await
            .map_err(|e| CoreError::HealthCheck(e.to_string()))?;
        self.health_checks
            .write()
            .await
            .map_err(|e| CoreError::HealthCheck(e.to_string()))?;

        let _ = self.event_tx.send(AgentEvent::CheckRegistered {
            shortname: NRPE_SHORTNAME.to_string(),
        });
        self.set_status(WorkloadStatus::active("ready"));

        self.state.flags.nrpe_configured = true;
        Ok(())
    }

    async fn remove_nrpe(&mut self) -> Result<(), CoreError> {
        self.health_checks
            .remove_check(NRPE_SHORTNAME)
            .await
            .map_err(|e| CoreError::HealthCheck(e.to_string()))?;
        self.health_checks
            .write()
            .await
            .map_err(|e| CoreError::HealthCheck(e.to_string()))?;

        info!(shortname = NRPE_SHORTNAME, "NRPE check removed");
        let _ = self.event_tx.send(AgentEvent::CheckRemoved {
            shortname: NRPE_SHORTNAME.to_string(),
        });

        self.state.flags.nrpe_configured = false;
        Ok(())
    }

    async fn publish_dashboards(&mut self) -> Result<(), CoreError> {
        let dir = self.settings.dashboard_dir.clone();

        if !dir.exists() {
            debug!(dir = %dir.display(), "no dashboard directory, nothing to publish");
            self.state.flags.publish_dashboards = false;
            return Ok(());
        }

        let dashboards =
            archive::list_dashboards(&dir).map_err(|e| CoreError::Dashboard(e.to_string()))?;

        for dashboard in &dashboards {
            self.dashboards
                .register_dashboard(&dashboard.name, &dashboard.json)
                .await
                .map_err(|e| CoreError::Dashboard(e.to_string()))?;
            debug!(name = %dashboard.name, "pushed dashboard");
            let _ = self.event_tx.send(AgentEvent::DashboardPublished {
                name: dashboard.name.clone(),
            });
        }

        info!(count = dashboards.len(), "dashboards published");
        self.state.flags.publish_dashboards = false;
        Ok(())
    }
}

impl Actor for AgentActor {
    type Args = AgentActorArgs;
    type Error = CoreError;

    async fn on_start(args: Self::Args, actor_ref: ActorRef<Self>) -> Result<Self, Self::Error> {
        info!(
            snap = %args.settings.snap_name,
            id = %actor_ref.id(),
            "AgentActor starting"
        );

        Ok(Self {
            settings: args.settings,
            state: args.state,
            store: args.store,
            installer: args.installer,
            services: args.services,
            firewall: args.firewall,
            health_checks: args.health_checks,
            scrape_targets: args.scrape_targets,
            dashboards: args.dashboards,
            event_tx: args.event_tx,
        })
    }

    async fn on_stop(
        &mut self,
        _actor_ref: WeakActorRef<Self>,
        reason: ActorStopReason,
    ) -> Result<(), Self::Error> {
        info!(reason = ?reason, "AgentActor stopping");
        Ok(())
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Message<Dispatch> for AgentActor {
    type Reply = Result<DispatchOutcome, CoreError>;

    async fn handle(
        &mut self,
        msg: Dispatch,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        info!(event = %msg.event, "dispatching hook event");

        self.apply_event(&msg.event).await;

        // A started exporter re-checks its configuration on every event
        if self.state.flags.started {
            self.state.flags.do_check_reconfig = true;
        }

        let mut fired: HashSet<Action> = HashSet::new();
        let mut executed = Vec::new();

        while let Some(action) = plan::next_action(&self.state, &fired) {
            fired.insert(action);
            debug!(action = %action, "running action");

            let before = self.state.flags.clone();
            let result = self.run_action(action, &msg.snapshot).await;
            self.emit_flag_changes(&before);

            if let Err(e) = result {
                error!(action = %action, error = %e, "action failed");
                self.set_status(WorkloadStatus::error(format!("{action} failed: {e}")));
                if let Err(persist_err) = self.persist() {
                    error!(error = %persist_err, "failed to persist state after action failure");
                }
                return Err(e);
            }

            executed.push(action);
        }

        self.state.last_dispatch = Some(Utc::now());
        self.persist()?;

        Ok(DispatchOutcome {
            actions: executed,
            status: self.state.status.clone(),
        })
    }
}

impl Message<GetAgentStatus> for AgentActor {
    type Reply = AgentStatusReport;

    async fn handle(
        &mut self,
        _msg: GetAgentStatus,
        _ctx: &mut Context<Self, Self::Reply>,
    ) -> Self::Reply {
        AgentStatusReport {
            flags: self.state.flags.clone(),
            relations: self.state.relations.clone(),
            status: self.state.status.clone(),
            last_dispatch: self.state.last_dispatch,
        }
    }
}
