//! Gating state for the Steam feed: only presence for the configured
//! account, while the game is running, reaches the engine.

use apex_presence_core::PresenceSnapshot;

use crate::event::{ERESULT_INVALID_PASSWORD, SteamEvent, to_snapshot};

/// Steam app id of Apex Legends.
pub const APEX_LEGENDS_APP_ID: u32 = 1_172_470;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// App whose play state turns the bridge on.
    pub app_id: u32,
    /// Account whose presence is forwarded. `None` uses the account
    /// reported by `logged_on`.
    pub account_id: Option<u32>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            app_id: APEX_LEGENDS_APP_ID,
            account_id: None,
        }
    }
}

/// What the bridge should do in response to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAction {
    /// The game started: open the publisher.
    Activate,
    /// The game stopped: clear and close the publisher.
    Deactivate,
    /// Translate and publish this snapshot.
    Snapshot(PresenceSnapshot),
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct SourceState {
    config: SourceConfig,
    active: bool,
    /// Own account as reported at login.
    logged_on_account: Option<u32>,
}

impl SourceState {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            active: false,
            logged_on_account: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Account whose presence is forwarded, if known yet.
    pub fn own_account(&self) -> Option<u32> {
        self.config.account_id.or(self.logged_on_account)
    }

    /// Map a feed event to a bridge action, updating the play state.
    pub fn handle(&mut self, event: SteamEvent) -> SourceAction {
        match event {
            SteamEvent::LoggedOn {
                account_id,
                vanity_url,
            } => {
                tracing::info!(
                    "logged in to steam (vanity url: {})",
                    vanity_url.as_deref().unwrap_or("-")
                );
                if account_id.is_some() {
                    self.logged_on_account = account_id;
                }
                if let (Some(configured), Some(reported)) = (self.config.account_id, account_id) {
                    if configured != reported {
                        tracing::warn!(
                            "--account-id {configured} overrides logged-in account {reported}"
                        );
                    }
                }
                SourceAction::Ignore
            }
            SteamEvent::PlayingState { playing_app, .. } => self.on_playing_state(playing_app),
            SteamEvent::User {
                account_id,
                rich_presence,
            } => {
                if !self.active {
                    return SourceAction::Ignore;
                }
                let Some(own) = self.own_account() else {
                    tracing::debug!("dropping presence for {account_id}: own account unknown");
                    return SourceAction::Ignore;
                };
                if own != account_id {
                    return SourceAction::Ignore;
                }
                if rich_presence.is_empty() {
                    return SourceAction::Ignore;
                }
                SourceAction::Snapshot(to_snapshot(rich_presence))
            }
            SteamEvent::Disconnected { eresult, msg } => {
                tracing::warn!(
                    "disconnected from steam with code {eresult}: {}",
                    msg.as_deref().unwrap_or("no message")
                );
                SourceAction::Ignore
            }
            SteamEvent::Error { eresult } => {
                if eresult == ERESULT_INVALID_PASSWORD {
                    tracing::error!("steam login failed: wrong password");
                } else {
                    tracing::error!("steam login failed with code {eresult}");
                }
                SourceAction::Ignore
            }
        }
    }

    fn on_playing_state(&mut self, playing_app: u32) -> SourceAction {
        let playing = playing_app == self.config.app_id;
        match (self.active, playing) {
            (false, true) => {
                tracing::info!("game started (app {playing_app}), enabling presence");
                self.active = true;
                SourceAction::Activate
            }
            (true, false) => {
                tracing::info!("game stopped (now app {playing_app}), disabling presence");
                self.active = false;
                SourceAction::Deactivate
            }
            _ => SourceAction::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_presence_core::PresenceToken;

    const OWN: u32 = 1;

    fn playing(app: u32) -> SteamEvent {
        SteamEvent::PlayingState {
            blocked: false,
            playing_app: app,
        }
    }

    fn logged_on(account_id: u32) -> SteamEvent {
        SteamEvent::LoggedOn {
            account_id: Some(account_id),
            vanity_url: None,
        }
    }

    fn user(account_id: u32) -> SteamEvent {
        SteamEvent::User {
            account_id,
            rich_presence: vec![PresenceToken::new("status", "#PL_TRAINING")],
        }
    }

    /// Logged in as `OWN`, game not started yet.
    fn logged_in() -> SourceState {
        let mut state = SourceState::new(SourceConfig::default());
        assert_eq!(state.handle(logged_on(OWN)), SourceAction::Ignore);
        state
    }

    #[test]
    fn presence_is_ignored_until_game_starts() {
        let mut state = logged_in();
        assert_eq!(state.handle(user(OWN)), SourceAction::Ignore);

        assert_eq!(state.handle(playing(APEX_LEGENDS_APP_ID)), SourceAction::Activate);
        assert!(state.is_active());
        assert!(matches!(state.handle(user(OWN)), SourceAction::Snapshot(_)));
    }

    #[test]
    fn repeated_play_state_does_not_reactivate() {
        let mut state = logged_in();
        state.handle(playing(APEX_LEGENDS_APP_ID));
        assert_eq!(state.handle(playing(APEX_LEGENDS_APP_ID)), SourceAction::Ignore);
    }

    #[test]
    fn switching_app_deactivates_once() {
        let mut state = logged_in();
        state.handle(playing(APEX_LEGENDS_APP_ID));
        assert_eq!(state.handle(playing(0)), SourceAction::Deactivate);
        assert_eq!(state.handle(playing(730)), SourceAction::Ignore);
        assert_eq!(state.handle(user(OWN)), SourceAction::Ignore);
    }

    #[test]
    fn friends_presence_is_filtered_by_logged_on_account() {
        let mut state = logged_in();
        state.handle(playing(APEX_LEGENDS_APP_ID));
        assert_eq!(state.own_account(), Some(OWN));
        assert_eq!(state.handle(user(2)), SourceAction::Ignore);
        assert!(matches!(state.handle(user(OWN)), SourceAction::Snapshot(_)));
    }

    #[test]
    fn presence_is_dropped_until_own_account_is_known() {
        let mut state = SourceState::new(SourceConfig::default());
        state.handle(playing(APEX_LEGENDS_APP_ID));
        assert_eq!(state.own_account(), None);
        assert_eq!(state.handle(user(OWN)), SourceAction::Ignore);
        assert_eq!(state.handle(user(2)), SourceAction::Ignore);

        state.handle(logged_on(OWN));
        assert!(matches!(state.handle(user(OWN)), SourceAction::Snapshot(_)));
    }

    #[test]
    fn login_without_account_keeps_dropping_presence() {
        let mut state = SourceState::new(SourceConfig::default());
        state.handle(SteamEvent::LoggedOn {
            account_id: None,
            vanity_url: Some("someone".into()),
        });
        state.handle(playing(APEX_LEGENDS_APP_ID));
        assert_eq!(state.handle(user(OWN)), SourceAction::Ignore);
    }

    #[test]
    fn configured_account_overrides_login() {
        let mut state = SourceState::new(SourceConfig {
            app_id: APEX_LEGENDS_APP_ID,
            account_id: Some(99),
        });
        state.handle(playing(APEX_LEGENDS_APP_ID));

        // No login needed when the account is configured.
        let SourceAction::Snapshot(snap) = state.handle(user(99)) else {
            panic!("configured account should pass");
        };
        assert_eq!(snap.get("status"), Some("#PL_TRAINING"));

        state.handle(logged_on(OWN));
        assert_eq!(state.own_account(), Some(99));
        assert_eq!(state.handle(user(OWN)), SourceAction::Ignore);
        assert!(matches!(state.handle(user(99)), SourceAction::Snapshot(_)));
    }

    #[test]
    fn empty_rich_presence_is_ignored() {
        let mut state = logged_in();
        state.handle(playing(APEX_LEGENDS_APP_ID));
        let ev = SteamEvent::User {
            account_id: OWN,
            rich_presence: Vec::new(),
        };
        assert_eq!(state.handle(ev), SourceAction::Ignore);
    }

    #[test]
    fn lifecycle_events_are_log_only() {
        let mut state = SourceState::new(SourceConfig::default());
        assert_eq!(state.handle(logged_on(OWN)), SourceAction::Ignore);
        assert_eq!(
            state.handle(SteamEvent::Error { eresult: ERESULT_INVALID_PASSWORD }),
            SourceAction::Ignore
        );
        assert_eq!(
            state.handle(SteamEvent::Disconnected {
                eresult: 3,
                msg: Some("no connection".into()),
            }),
            SourceAction::Ignore
        );
        assert!(!state.is_active());
    }

    #[test]
    fn custom_app_id() {
        let mut state = SourceState::new(SourceConfig {
            app_id: 480,
            account_id: None,
        });
        assert_eq!(state.handle(playing(APEX_LEGENDS_APP_ID)), SourceAction::Ignore);
        assert_eq!(state.handle(playing(480)), SourceAction::Activate);
    }
}
