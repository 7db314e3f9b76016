//! Dashboard panel driver
//!
//! A single spawned task owns the surface, the factory, and every mutable
//! slot. Inbound events and load completions arrive over channels and are
//! handled one at a time in arrival order. At most one load token is live;
//! superseding a token signals its cancel channel, and a completion is
//! applied only while it still carries the current generation.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::state::{ConnectivityState, PanelPhase, PanelStatus};
use crate::surface::{PanelSurface, ViewFactory};
use crate::tab::TabKind;
use crate::{PanelError, Result};

/// Inbound events consumed by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    /// The header selected a tab. Always reloads, even when the selected tab
    /// equals the one already displayed.
    TabSelected(TabKind),
    /// The overlay finished appearing.
    PoppedIn,
    /// The overlay finished disappearing.
    PoppedOut,
    /// Platform reachability changed.
    Connectivity(ConnectivityState),
    /// Tear the panel down.
    Shutdown,
}

struct Completion<V> {
    generation: u64,
    outcome: Result<V>,
}

enum Step<V> {
    Event(PanelEvent),
    Completion(Completion<V>),
}

struct LoadToken {
    generation: u64,
    cancel: watch::Sender<bool>,
}

/// The panel task. Constructed and spawned through [`DashboardPanel::spawn`];
/// interaction happens through the returned [`PanelHandle`].
pub struct DashboardPanel<S: PanelSurface, F> {
    surface: S,
    factory: F,
    events: mpsc::UnboundedReceiver<PanelEvent>,
    completions: mpsc::UnboundedReceiver<Completion<S::View>>,
    completions_tx: mpsc::UnboundedSender<Completion<S::View>>,
    status: watch::Sender<PanelStatus>,
    current_tab: TabKind,
    phase: PanelPhase,
    visible: bool,
    online: bool,
    redisplay_required: bool,
    has_content: bool,
    generation: u64,
    live: Option<LoadToken>,
}

impl<S, F> DashboardPanel<S, F>
where
    S: PanelSurface,
    F: ViewFactory<View = S::View>,
{
    /// Spawn the panel task.
    ///
    /// The panel starts hidden, online, with no content and a pending
    /// redisplay, so the first pop-in always loads the current tab.
    pub fn spawn(surface: S, factory: F) -> PanelHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let initial = PanelStatus {
            phase: PanelPhase::Idle {
                tab: TabKind::default(),
            },
            visible: false,
            online: true,
            redisplay_required: true,
            has_content: false,
        };
        let (status_tx, status_rx) = watch::channel(initial);

        let panel = Self {
            surface,
            factory,
            events: events_rx,
            completions: completions_rx,
            completions_tx,
            status: status_tx,
            current_tab: TabKind::default(),
            phase: initial.phase,
            visible: false,
            online: true,
            redisplay_required: true,
            has_content: false,
            generation: 0,
            live: None,
        };

        let task = tokio::spawn(panel.run());

        tracing::info!("Dashboard panel started");

        PanelHandle {
            events: PanelEvents { tx: events_tx },
            status: status_rx,
            task,
        }
    }

    async fn run(mut self) {
        loop {
            let step = tokio::select! {
                biased;
                event = self.events.recv() => match event {
                    Some(event) => Step::Event(event),
                    // Every sender dropped: same as an explicit shutdown.
                    None => break,
                },
                completion = self.completions.recv() => match completion {
                    Some(completion) => Step::Completion(completion),
                    None => continue,
                },
            };

            match step {
                Step::Event(PanelEvent::Shutdown) => break,
                Step::Event(event) => self.handle_event(event),
                Step::Completion(completion) => self.handle_completion(completion),
            }
        }

        self.shutdown();
    }

    fn handle_event(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::TabSelected(tab) => {
                tracing::debug!(tab = %tab, "Tab selected");
                self.current_tab = tab;
                self.begin_load(tab);
            }
            PanelEvent::PoppedIn => {
                self.visible = true;
                if self.redisplay_required {
                    self.redisplay_required = false;
                    self.begin_load(self.current_tab);
                } else {
                    self.publish();
                }
            }
            PanelEvent::PoppedOut => {
                self.visible = false;
                self.cancel_live();
                self.clear_display();
                self.surface.hide_loading();
                self.phase = PanelPhase::Idle {
                    tab: self.current_tab,
                };
                self.redisplay_required = true;
                self.publish();
            }
            PanelEvent::Connectivity(ConnectivityState::Offline) => {
                tracing::debug!("Connectivity lost");
                self.online = false;
                self.cancel_live();
                self.clear_display();
                self.surface.show_loading();
                self.phase = PanelPhase::Loading {
                    tab: self.current_tab,
                };
                self.redisplay_required = true;
                self.publish();
            }
            PanelEvent::Connectivity(ConnectivityState::Online) => {
                tracing::debug!("Connectivity restored");
                self.online = true;
                self.redisplay_required = true;
                if self.visible {
                    self.redisplay_required = false;
                    self.begin_load(self.current_tab);
                } else {
                    self.publish();
                }
            }
            PanelEvent::Shutdown => unreachable!("handled by the run loop"),
        }
    }

    fn begin_load(&mut self, tab: TabKind) {
        self.cancel_live();

        if !self.online {
            // No load attempts while offline; the connectivity-restored
            // path replays via the redisplay flag.
            self.clear_display();
            self.surface.show_loading();
            self.phase = PanelPhase::Loading { tab };
            self.redisplay_required = true;
            self.publish();
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.live = Some(LoadToken {
            generation,
            cancel: cancel_tx,
        });

        self.surface.show_loading();
        self.surface.scroll_to_start();
        self.phase = PanelPhase::Loading { tab };
        self.publish();

        tracing::debug!(tab = %tab, generation, "Building content view");

        let build = self.factory.build(tab);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled(cancel_rx) => {
                    tracing::debug!(generation, "Content build canceled");
                }
                outcome = build => {
                    let _ = completions.send(Completion { generation, outcome });
                }
            }
        });
    }

    fn handle_completion(&mut self, completion: Completion<S::View>) {
        let is_current = self
            .live
            .as_ref()
            .is_some_and(|token| token.generation == completion.generation);

        if !is_current {
            tracing::debug!(
                generation = completion.generation,
                "Discarding superseded load result"
            );
            return;
        }

        self.live = None;

        match completion.outcome {
            Ok(view) => {
                self.surface.hide_loading();
                self.surface.install(view);
                self.has_content = true;
                tracing::debug!(tab = %self.current_tab, "Content view installed");
            }
            Err(e) => {
                tracing::warn!(tab = %self.current_tab, error = %e, "Content build failed");
                self.surface.hide_loading();
                self.clear_display();
            }
        }

        self.phase = PanelPhase::Idle {
            tab: self.current_tab,
        };
        self.publish();
    }

    fn cancel_live(&mut self) {
        if let Some(token) = self.live.take() {
            tracing::debug!(generation = token.generation, "Canceling in-flight load");
            let _ = token.cancel.send(true);
        }
    }

    fn clear_display(&mut self) {
        self.surface.scroll_to_start();
        self.surface.clear();
        self.has_content = false;
    }

    fn shutdown(&mut self) {
        self.cancel_live();
        self.phase = PanelPhase::Closed;
        self.publish();
        tracing::info!("Dashboard panel closed");
    }

    fn publish(&self) {
        let _ = self.status.send(PanelStatus {
            phase: self.phase,
            visible: self.visible,
            online: self.online,
            redisplay_required: self.redisplay_required,
            has_content: self.has_content,
        });
    }
}

// A dropped sender counts as cancellation; the driver never drops a live
// token without signalling first, so this only closes the task early.
async fn cancelled(mut cancel: watch::Receiver<bool>) {
    let _ = cancel.wait_for(|canceled| *canceled).await;
}

/// Clonable event emitter for the panel.
#[derive(Clone)]
pub struct PanelEvents {
    tx: mpsc::UnboundedSender<PanelEvent>,
}

impl PanelEvents {
    pub fn send(&self, event: PanelEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| PanelError::Closed)
    }

    pub fn select_tab(&self, tab: TabKind) -> Result<()> {
        self.send(PanelEvent::TabSelected(tab))
    }

    pub fn pop_in(&self) -> Result<()> {
        self.send(PanelEvent::PoppedIn)
    }

    pub fn pop_out(&self) -> Result<()> {
        self.send(PanelEvent::PoppedOut)
    }

    pub fn set_connectivity(&self, state: ConnectivityState) -> Result<()> {
        self.send(PanelEvent::Connectivity(state))
    }
}

/// Owner-side handle to a spawned panel.
pub struct PanelHandle {
    events: PanelEvents,
    status: watch::Receiver<PanelStatus>,
    task: JoinHandle<()>,
}

impl PanelHandle {
    /// A clonable emitter, for wiring observers to the panel.
    pub fn events(&self) -> PanelEvents {
        self.events.clone()
    }

    pub fn select_tab(&self, tab: TabKind) -> Result<()> {
        self.events.select_tab(tab)
    }

    pub fn pop_in(&self) -> Result<()> {
        self.events.pop_in()
    }

    pub fn pop_out(&self) -> Result<()> {
        self.events.pop_out()
    }

    pub fn set_connectivity(&self, state: ConnectivityState) -> Result<()> {
        self.events.set_connectivity(state)
    }

    /// Latest published status snapshot.
    pub fn status(&self) -> PanelStatus {
        *self.status.borrow()
    }

    /// Watch status transitions as they are published.
    pub fn watch_status(&self) -> watch::Receiver<PanelStatus> {
        self.status.clone()
    }

    /// Tear the panel down, cancelling any in-flight load, and wait for the
    /// task to finish.
    pub async fn close(self) {
        let _ = self.events.send(PanelEvent::Shutdown);
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SurfaceCall {
        ShowLoading,
        HideLoading,
        Install(&'static str),
        Clear,
        ScrollToStart,
    }

    #[derive(Clone, Default)]
    struct RecordingSurface {
        calls: Arc<Mutex<Vec<SurfaceCall>>>,
    }

    impl RecordingSurface {
        fn calls(&self) -> Vec<SurfaceCall> {
            self.calls.lock().unwrap().clone()
        }

        fn installs(&self) -> Vec<&'static str> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    SurfaceCall::Install(label) => Some(label),
                    _ => None,
                })
                .collect()
        }

        fn push(&self, call: SurfaceCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl PanelSurface for RecordingSurface {
        type View = &'static str;

        fn show_loading(&mut self) {
            self.push(SurfaceCall::ShowLoading);
        }

        fn hide_loading(&mut self) {
            self.push(SurfaceCall::HideLoading);
        }

        fn install(&mut self, view: &'static str) {
            self.push(SurfaceCall::Install(view));
        }

        fn clear(&mut self) {
            self.push(SurfaceCall::Clear);
        }

        fn scroll_to_start(&mut self) {
            self.push(SurfaceCall::ScrollToStart);
        }
    }

    #[derive(Default)]
    struct TestFactory {
        delays: HashMap<TabKind, Duration>,
        failing: HashSet<TabKind>,
        never_completes: HashSet<TabKind>,
    }

    impl TestFactory {
        fn delayed(tab: TabKind, delay: Duration) -> Self {
            let mut factory = Self::default();
            factory.delays.insert(tab, delay);
            factory
        }
    }

    impl ViewFactory for TestFactory {
        type View = &'static str;

        fn build(&self, tab: TabKind) -> BoxFuture<'static, Result<&'static str>> {
            let delay = self.delays.get(&tab).copied().unwrap_or_default();
            let fails = self.failing.contains(&tab);
            let never_completes = self.never_completes.contains(&tab);

            Box::pin(async move {
                if never_completes {
                    std::future::pending::<()>().await;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                if fails {
                    Err(PanelError::ViewBuild("backing service unavailable".into()))
                } else {
                    Ok(label(tab))
                }
            })
        }
    }

    fn label(tab: TabKind) -> &'static str {
        match tab {
            TabKind::Friends => "friends",
            TabKind::CurrentlyOnline => "currently_online",
        }
    }

    async fn wait_status(
        rx: &mut watch::Receiver<PanelStatus>,
        predicate: impl FnMut(&PanelStatus) -> bool,
    ) -> PanelStatus {
        *rx.wait_for(predicate)
            .await
            .expect("panel status channel closed")
    }

    fn settled_on(tab: TabKind) -> impl FnMut(&PanelStatus) -> bool {
        move |status| status.phase == PanelPhase::Idle { tab } && status.has_content
    }

    #[tokio::test]
    async fn test_tab_selection_swaps_in_content() {
        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), TestFactory::default());
        let mut status = handle.watch_status();

        handle.select_tab(TabKind::Friends).unwrap();
        let settled = wait_status(&mut status, settled_on(TabKind::Friends)).await;

        assert!(settled.is_idle());
        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::ShowLoading,
                SurfaceCall::ScrollToStart,
                SurfaceCall::HideLoading,
                SurfaceCall::Install("friends"),
            ]
        );

        handle.close().await;
    }

    #[tokio::test]
    async fn test_rapid_tab_changes_install_only_the_last() {
        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), TestFactory::default());
        let mut status = handle.watch_status();

        handle.select_tab(TabKind::Friends).unwrap();
        handle.select_tab(TabKind::CurrentlyOnline).unwrap();
        handle.select_tab(TabKind::Friends).unwrap();
        handle.select_tab(TabKind::Friends).unwrap();
        handle.select_tab(TabKind::CurrentlyOnline).unwrap();

        wait_status(&mut status, settled_on(TabKind::CurrentlyOnline)).await;

        assert_eq!(surface.installs(), vec!["currently_online"]);

        handle.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_superseded_load_never_lands() {
        let mut factory = TestFactory::delayed(TabKind::Friends, Duration::from_millis(100));
        factory
            .delays
            .insert(TabKind::CurrentlyOnline, Duration::from_millis(10));

        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), factory);
        let mut status = handle.watch_status();

        handle.select_tab(TabKind::Friends).unwrap();
        wait_status(&mut status, |s| {
            s.phase
                == PanelPhase::Loading {
                    tab: TabKind::Friends,
                }
        })
        .await;

        handle.select_tab(TabKind::CurrentlyOnline).unwrap();
        wait_status(&mut status, settled_on(TabKind::CurrentlyOnline)).await;

        // Give the slower build's deadline time to pass; it must stay dead.
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(surface.installs(), vec!["currently_online"]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_reselecting_current_tab_reloads() {
        let surface = RecordingSurface::default();
        let factory = TestFactory::delayed(TabKind::Friends, Duration::from_millis(1));
        let handle = DashboardPanel::spawn(surface.clone(), factory);
        let mut status = handle.watch_status();

        handle.select_tab(TabKind::Friends).unwrap();
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        handle.select_tab(TabKind::Friends).unwrap();
        wait_status(&mut status, |s| s.is_loading()).await;
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        assert_eq!(surface.installs(), vec!["friends", "friends"]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_pop_out_clears_and_pop_in_reloads() {
        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), TestFactory::default());
        let mut status = handle.watch_status();

        handle.pop_in().unwrap();
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        handle.pop_out().unwrap();
        let hidden = wait_status(&mut status, |s| !s.visible).await;
        assert!(hidden.redisplay_required);
        assert!(!hidden.has_content);
        assert!(surface.calls().contains(&SurfaceCall::Clear));

        handle.pop_in().unwrap();
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        assert_eq!(surface.installs(), vec!["friends", "friends"]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_pop_in_without_pending_redisplay_keeps_content() {
        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), TestFactory::default());
        let mut status = handle.watch_status();

        handle.pop_in().unwrap();
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        // No pop-out in between: popping in again must not reload.
        handle.pop_in().unwrap();
        status.changed().await.unwrap();
        let after = *status.borrow();

        assert!(after.is_idle());
        assert!(after.has_content);
        assert_eq!(surface.installs(), vec!["friends"]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_connectivity_loss_clears_and_restore_reloads_once() {
        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), TestFactory::default());
        let mut status = handle.watch_status();

        handle.pop_in().unwrap();
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        handle.set_connectivity(ConnectivityState::Offline).unwrap();
        let offline = wait_status(&mut status, |s| !s.online).await;
        assert!(offline.is_loading());
        assert!(offline.redisplay_required);
        assert!(!offline.has_content);
        assert!(surface.calls().contains(&SurfaceCall::Clear));

        handle.set_connectivity(ConnectivityState::Online).unwrap();
        wait_status(&mut status, settled_on(TabKind::Friends)).await;

        assert_eq!(surface.installs(), vec!["friends", "friends"]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_tab_selection_while_offline_defers_until_visible_again() {
        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), TestFactory::default());
        let mut status = handle.watch_status();

        handle.set_connectivity(ConnectivityState::Offline).unwrap();
        wait_status(&mut status, |s| !s.online).await;

        handle.select_tab(TabKind::CurrentlyOnline).unwrap();
        let deferred = wait_status(&mut status, |s| {
            s.phase
                == PanelPhase::Loading {
                    tab: TabKind::CurrentlyOnline,
                }
        })
        .await;
        assert!(deferred.redisplay_required);
        assert!(surface.installs().is_empty());

        // Hidden panel: restoration alone must not load yet.
        handle.set_connectivity(ConnectivityState::Online).unwrap();
        let online = wait_status(&mut status, |s| s.online).await;
        assert!(online.redisplay_required);
        assert!(surface.installs().is_empty());

        handle.pop_in().unwrap();
        wait_status(&mut status, settled_on(TabKind::CurrentlyOnline)).await;

        assert_eq!(surface.installs(), vec!["currently_online"]);

        handle.close().await;
    }

    #[tokio::test]
    async fn test_failed_build_hides_indicator_and_leaves_empty() {
        let mut factory = TestFactory::default();
        factory.failing.insert(TabKind::CurrentlyOnline);

        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), factory);
        let mut status = handle.watch_status();

        handle.select_tab(TabKind::CurrentlyOnline).unwrap();
        let settled = wait_status(&mut status, |s| {
            s.phase
                == PanelPhase::Idle {
                    tab: TabKind::CurrentlyOnline,
                }
        })
        .await;

        assert!(!settled.has_content);
        assert!(surface.installs().is_empty());
        let calls = surface.calls();
        assert!(calls.contains(&SurfaceCall::HideLoading));
        assert!(calls.contains(&SurfaceCall::Clear));

        handle.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_in_flight_load() {
        let mut factory = TestFactory::default();
        factory.never_completes.insert(TabKind::Friends);

        let surface = RecordingSurface::default();
        let handle = DashboardPanel::spawn(surface.clone(), factory);
        let mut status = handle.watch_status();

        handle.select_tab(TabKind::Friends).unwrap();
        wait_status(&mut status, |s| s.is_loading()).await;

        handle.close().await;

        assert!(status.borrow().is_closed());
        assert!(surface.installs().is_empty());

        // Nothing may fire after teardown.
        let calls_at_close = surface.calls();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(surface.calls(), calls_at_close);
    }

    #[tokio::test]
    async fn test_events_after_close_report_closed() {
        let handle = DashboardPanel::spawn(RecordingSurface::default(), TestFactory::default());
        let events = handle.events();

        handle.close().await;

        assert!(matches!(
            events.select_tab(TabKind::Friends),
            Err(PanelError::Closed)
        ));
    }
}
