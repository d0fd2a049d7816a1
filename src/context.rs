//! Plugin context
//!
//! The configuration, classifier chain and process inspector, built once when
//! the plugin starts and handed to every operation that needs them.

use crate::clone::CloneOrchestrator;
use crate::config::loader::ConfigLoader;
use crate::config::RemoteConfig;
use crate::error::{DetectionGap, Result};
use crate::host::{Host, PaneId};
use crate::process::ProcessInspector;
use crate::scraper::TextScraper;
use crate::session::classifier::Evidence;
use crate::session::{Session, SessionClassifier};

/// Everything detection and cloning need, without globals
pub struct RemoteContext {
    config: RemoteConfig,
    classifier: SessionClassifier,
    inspector: ProcessInspector,
}

impl RemoteContext {
    /// Context with the default classifiers and the platform process table
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_parts(config, SessionClassifier::with_defaults(), ProcessInspector::new())
    }

    /// Context from explicit parts
    pub fn with_parts(
        config: RemoteConfig,
        classifier: SessionClassifier,
        inspector: ProcessInspector,
    ) -> Self {
        Self {
            config,
            classifier,
            inspector,
        }
    }

    /// Context with configuration from the default locations
    pub fn load() -> Result<Self> {
        Ok(Self::new(ConfigLoader::load()?))
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RemoteConfig {
        &mut self.config
    }

    pub fn classifier(&self) -> &SessionClassifier {
        &self.classifier
    }

    pub fn inspector(&self) -> &ProcessInspector {
        &self.inspector
    }

    /// Collect detection evidence for `pane`.
    ///
    /// Pane text is only read when `with_text` is set and the pane has child
    /// processes at all.
    pub fn evidence<H: Host + ?Sized>(&self, host: &H, pane: PaneId, with_text: bool) -> Evidence {
        let Some(pid) = host.foreground_process_id(pane) else {
            debug!(target: "Remote", "pane {}: {}", pane, DetectionGap::PaneGone);
            return Evidence::default();
        };

        let processes = self.inspector.descendants(pid);
        let text = (with_text && !processes.is_empty())
            .then(|| TextScraper::snapshot(host, pane));

        Evidence { processes, text }
    }

    /// Detect the remote session currently running in `pane`
    pub fn detect<H: Host + ?Sized>(&self, host: &H, pane: PaneId) -> Option<Session> {
        let infer_cwd = self.config.infer_cwd;
        let evidence = self.evidence(host, pane, infer_cwd);
        self.classifier.classify(&evidence, pane, infer_cwd)
    }

    /// Like [`detect`](Self::detect) but never reads pane text
    pub fn detect_without_cwd<H: Host + ?Sized>(&self, host: &H, pane: PaneId) -> Option<Session> {
        let evidence = self.evidence(host, pane, false);
        self.classifier.classify(&evidence, pane, false)
    }

    /// Orchestrator bound to this context's configuration
    pub fn orchestrator(&self) -> CloneOrchestrator<'_> {
        CloneOrchestrator::new(&self.config)
    }
}

impl Default for RemoteContext {
    fn default() -> Self {
        Self::new(RemoteConfig::default())
    }
}
