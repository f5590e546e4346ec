//! Integration tests for the waveform session.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, StreamExt};
use wavecontrol::config::PlayerConfig;
use wavecontrol::services::waveform::{
    ControlOutcome, HeadlessBackend, HeadlessPlayer, SurfaceId, WaveformError, WaveformSession,
    math::MAX_SEEK_FRACTION,
};

const TAKE: &str = "take.wav";

fn backend() -> HeadlessBackend {
    HeadlessBackend::new().with_media(TAKE, 20.0)
}

fn session_with(backend: &HeadlessBackend, config: &PlayerConfig) -> WaveformSession {
    WaveformSession::with_config(Arc::new(backend.clone()), config)
}

fn ready_session(backend: &HeadlessBackend) -> WaveformSession {
    let mut session = session_with(backend, &PlayerConfig::default());
    session.initialize(SurfaceId::new("wave")).unwrap();
    assert_eq!(session.load(TAKE), ControlOutcome::Applied);
    session
}

fn latest(backend: &HeadlessBackend) -> Arc<HeadlessPlayer> {
    backend.latest_player().unwrap()
}

mod before_initialize {
    use super::*;

    #[tokio::test]
    async fn transport_reports_not_initialized() {
        let session = session_with(&backend(), &PlayerConfig::default());
        let before = session.snapshot();

        assert_eq!(session.load(TAKE), ControlOutcome::NotInitialized);
        assert_eq!(session.load_from_data(&[0; 64]), ControlOutcome::NotInitialized);
        assert_eq!(session.play(), ControlOutcome::NotInitialized);
        assert_eq!(session.pause(), ControlOutcome::NotInitialized);
        assert_eq!(session.toggle_play_pause(), ControlOutcome::NotInitialized);
        assert_eq!(session.seek_to(3.0), ControlOutcome::NotInitialized);
        assert_eq!(session.set_playback_speed(2.0), ControlOutcome::NotInitialized);
        assert_eq!(session.adjust_playback_rate(0.5), ControlOutcome::NotInitialized);
        assert_eq!(session.playback_rate(), 1.0);
        assert!(!session.is_playing());

        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test]
    async fn derived_views_read_zero() {
        let session = session_with(&backend(), &PlayerConfig::default());
        assert_eq!(session.state().current_time.get(), 0.0);
        assert_eq!(session.state().duration.get(), 0.0);
        assert!(!session.is_initialized());
        assert!(session.refresher().is_none());
    }

    #[test]
    fn initialize_needs_a_runtime() {
        let mut session = session_with(&backend(), &PlayerConfig::default());
        let result = session.initialize(SurfaceId::new("wave"));
        assert!(matches!(result, Err(WaveformError::RuntimeUnavailable)));
        assert!(!session.is_initialized());
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn initialize_registers_extensions_and_volume() {
        let backend = backend();
        let config = PlayerConfig {
            initial_volume: 40.0,
            ..PlayerConfig::default()
        };
        let mut session = session_with(&backend, &config);
        let id = session.initialize(SurfaceId::new("wave")).unwrap();

        let player = latest(&backend);
        assert_eq!(player.surface(), &SurfaceId::new("wave"));
        assert_eq!(player.options().theme.wave_color, "#BF74C9");
        assert_eq!(player.zoom_options(), Some(config.zoom));
        assert!(player.has_regions());
        assert_eq!(player.gain(), 0.4);

        assert_eq!(session.state().player.get().unwrap().id, id);
        assert!(session.state().annotations_current());
    }

    #[tokio::test]
    async fn failed_initialize_keeps_previous_player() {
        let backend = backend();
        let mut session = ready_session(&backend);
        let id = session.state().player.get().unwrap().id;

        let result = session.initialize(SurfaceId::new(""));
        assert!(matches!(result, Err(WaveformError::SurfaceUnavailable(_))));
        assert_eq!(session.state().player.get().unwrap().id, id);
        assert!(session.refresher().is_some());
    }

    #[tokio::test]
    async fn reinitialize_replaces_player_and_annotations() {
        let backend = backend();
        let mut session = ready_session(&backend);
        let first = session.state().player.get().unwrap();
        let first_annotations = session.state().annotations.get().unwrap();

        let second_id = session.initialize(SurfaceId::new("wave")).unwrap();
        let second = session.state().player.get().unwrap();

        assert_ne!(first, second);
        assert_eq!(second.id, second_id);
        assert!(!first_annotations.belongs_to(&second));
        assert!(session.state().annotations_current());
        assert_eq!(backend.players().len(), 2);
        assert_eq!(session.state().duration.get(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn reinitialize_counts_each_interval_once() {
        let backend = backend();
        let mut session = session_with(&backend, &PlayerConfig::default());
        session.initialize(SurfaceId::new("wave")).unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(session.refresh_ticks(), 2);

        session.initialize(SurfaceId::new("wave")).unwrap();
        tokio::time::sleep(Duration::from_millis(55)).await;

        assert_eq!(session.refresh_ticks(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn double_initialize_runs_one_refresher() {
        let backend = backend();
        let mut session = session_with(&backend, &PlayerConfig::default());
        session.initialize(SurfaceId::new("wave")).unwrap();
        session.initialize(SurfaceId::new("wave")).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let ticks = session.refresh_ticks();
        assert!((9..=11).contains(&ticks), "ticks = {ticks}");
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_stops_refreshing_but_keeps_player() {
        let backend = backend();
        let mut session = ready_session(&backend);
        tokio::time::sleep(Duration::from_millis(50)).await;

        session.teardown();
        let ticks = session.refresh_ticks();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(session.refresh_ticks(), ticks);
        assert!(session.refresher().is_none());
        assert!(session.is_initialized());
        assert_eq!(session.state().duration.get(), 20.0);
    }

    #[tokio::test]
    async fn dispose_releases_player() {
        let backend = backend();
        let mut session = ready_session(&backend);
        let _ = session.adjust_volume(-0.5);

        session.dispose();

        assert!(!session.is_initialized());
        assert!(session.state().annotations.get().is_none());
        assert_eq!(session.state().current_time.get(), 0.0);
        assert_eq!(session.state().duration.get(), 0.0);
        assert_eq!(*session.state().volume.get(), 50.0);
        assert_eq!(session.play(), ControlOutcome::NotInitialized);
    }

    #[tokio::test]
    async fn dispose_lets_the_backend_drop_players() {
        let backend = backend();
        let mut session = session_with(&backend, &PlayerConfig::default());
        for _ in 0..5 {
            session.initialize(SurfaceId::new("wave")).unwrap();
        }
        assert_eq!(backend.players().len(), 1);

        session.dispose();

        assert!(backend.players().is_empty());
        assert!(backend.latest_player().is_none());
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let backend = backend();
        let first = ready_session(&backend);
        let second = session_with(&backend, &PlayerConfig::default());

        let _ = first.set_playback_speed(1.5);
        assert_eq!(first.playback_rate(), 1.5);
        assert_eq!(second.playback_rate(), 1.0);
        assert!(!second.is_initialized());
    }
}

mod transport {
    use super::*;

    #[tokio::test]
    async fn set_speed_then_query() {
        let session = ready_session(&backend());
        assert_eq!(session.set_playback_speed(2.0), ControlOutcome::Applied);
        assert_eq!(session.playback_rate(), 2.0);
    }

    #[tokio::test]
    async fn relative_rate_multiplies() {
        let session = ready_session(&backend());
        let _ = session.set_playback_speed(2.0);
        assert_eq!(session.adjust_playback_rate(0.5), ControlOutcome::Applied);
        assert_eq!(session.playback_rate(), 1.0);
    }

    #[tokio::test]
    async fn unusable_rates_are_rejected() {
        let session = ready_session(&backend());
        assert_eq!(session.set_playback_speed(0.0), ControlOutcome::Rejected);
        assert_eq!(session.set_playback_speed(f64::NAN), ControlOutcome::Rejected);
        assert_eq!(session.adjust_playback_rate(-1.0), ControlOutcome::Rejected);
        assert_eq!(session.playback_rate(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_change_keeps_position() {
        let session = ready_session(&backend());
        let _ = session.seek_to(8.0);
        let _ = session.play();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let _ = session.set_playback_speed(0.5);
        assert!((session.state().current_time.get() - 10.0).abs() < 1e-3);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!((session.state().current_time.get() - 11.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn seek_is_clamped_to_media() {
        let session = ready_session(&backend());

        let _ = session.seek_to(5.0);
        assert!((session.state().current_time.get() - 5.0).abs() < 1e-9);

        let _ = session.seek_to(500.0);
        let expected = 20.0 * MAX_SEEK_FRACTION;
        assert!((session.state().current_time.get() - expected).abs() < 1e-9);

        let _ = session.seek_to(-4.0);
        assert_eq!(session.state().current_time.get(), 0.0);
    }

    #[tokio::test]
    async fn seek_without_length_goes_to_start() {
        let backend = backend();
        let mut session = session_with(&backend, &PlayerConfig::default());
        session.initialize(SurfaceId::new("wave")).unwrap();
        let _ = session.load("unknown.wav");

        assert_eq!(session.seek_to(12.0), ControlOutcome::Applied);
        assert_eq!(session.state().current_time.get(), 0.0);
    }

    #[tokio::test]
    async fn toggle_inverts_playback() {
        let session = ready_session(&backend());
        assert!(!session.is_playing());

        let _ = session.toggle_play_pause();
        assert!(session.is_playing());

        let _ = session.toggle_play_pause();
        assert!(!session.is_playing());
    }

    #[tokio::test]
    async fn blob_load_sets_duration() {
        let backend = HeadlessBackend::new().with_blob_byte_rate(100.0);
        let mut session = session_with(&backend, &PlayerConfig::default());
        session.initialize(SurfaceId::new("wave")).unwrap();

        assert_eq!(session.load_from_data(&[0; 450]), ControlOutcome::Applied);
        assert_eq!(session.state().duration.get(), 4.5);
    }
}

mod volume {
    use super::*;

    fn session_at(percent: f64) -> (HeadlessBackend, WaveformSession) {
        let backend = backend();
        let config = PlayerConfig {
            initial_volume: percent,
            ..PlayerConfig::default()
        };
        let mut session = session_with(&backend, &config);
        session.initialize(SurfaceId::new("wave")).unwrap();
        (backend, session)
    }

    #[tokio::test]
    async fn raise_from_full_stays_full() {
        let (backend, session) = session_at(100.0);
        assert_eq!(*session.adjust_volume(0.1), 100.0);
        assert_eq!(latest(&backend).gain(), 1.0);
    }

    #[tokio::test]
    async fn raise_from_half() {
        let (backend, session) = session_at(50.0);
        let volume = session.adjust_volume(0.1);
        assert!((*volume - 60.0).abs() < 1e-9);
        assert!((latest(&backend).gain() - 0.6).abs() < 1e-9);
        assert_eq!(session.state().volume.get(), volume);
    }

    #[tokio::test]
    async fn lower_past_floor() {
        let (backend, session) = session_at(30.0);
        assert_eq!(*session.adjust_volume(-1.0), 0.0);
        assert_eq!(latest(&backend).gain(), 0.0);
    }

    #[tokio::test]
    async fn volume_survives_reinitialize() {
        let (backend, mut session) = session_at(100.0);
        let _ = session.adjust_volume(-0.3);
        session.initialize(SurfaceId::new("wave")).unwrap();

        assert!((*session.state().volume.get() - 70.0).abs() < 1e-9);
        assert!((latest(&backend).gain() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn adjusts_without_player() {
        let session = session_with(&backend(), &PlayerConfig::default());
        assert_eq!(*session.adjust_volume(-0.25), 75.0);
    }
}

mod observation {
    use super::*;

    #[tokio::test]
    async fn queries_do_not_notify() {
        let mut session = ready_session(&backend());
        session.teardown();

        let mut player = Box::pin(session.state().player.watch());
        assert!(player.next().await.is_some());

        let _ = session.playback_rate();
        let _ = session.is_playing();
        let _ = session.snapshot();
        assert!(player.next().now_or_never().is_none());

        let _ = session.play();
        assert!(player.next().now_or_never().flatten().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn current_time_follows_player_clock() {
        let session = ready_session(&backend());
        let mut times = Box::pin(session.state().current_time.watch());
        assert_eq!(times.next().await, Some(0.0));

        let _ = session.play();
        tokio::time::sleep(Duration::from_secs(1)).await;

        let seen = times.next().await.unwrap();
        assert!(seen > 0.0);
        assert!((session.state().current_time.get() - 1.0).abs() < 1e-9);
        assert!(session.refresh_ticks() >= 90);
    }

    #[tokio::test]
    async fn annotations_are_reachable() {
        let session = ready_session(&backend());
        let annotations = session.state().annotations.get().unwrap();
        annotations
            .regions()
            .add_region(wavecontrol::services::waveform::RegionSpec {
                start: 1.0,
                end: 2.0,
                ..Default::default()
            });

        assert_eq!(session.snapshot().regions, 1);
    }
}
