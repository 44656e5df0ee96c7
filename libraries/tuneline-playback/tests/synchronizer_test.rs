//! End-to-end synchronizer scenarios against simulated backends
//!
//! Covers the full load -> ready -> play -> progress flow for both
//! backends, backend switching mid-playback and the teardown races.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tuneline_playback::events::{MediaEvent, WaveformEvent};
use tuneline_playback::simulated::{Command, SimulatedFactory};
use tuneline_playback::{
    DisplayMode, ManualClock, PlayerConfig, PlayerError, PlayerView, SyncOptions, Synchronizer,
    ViewState,
};

// ===== Helpers =====

type Emissions = Rc<RefCell<Vec<ViewState>>>;

fn create(
    src: &str,
    mode: DisplayMode,
    factory: &Rc<SimulatedFactory>,
) -> (Synchronizer, Emissions, Rc<ManualClock>) {
    let emissions: Emissions = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(ManualClock::new());
    let sink = Rc::clone(&emissions);
    let sync = Synchronizer::with_options(
        src,
        mode,
        factory.clone(),
        SyncOptions::default(),
        clock.clone(),
        move |state: &ViewState| sink.borrow_mut().push(state.clone()),
    );
    (sync, emissions, clock)
}

fn last(emissions: &Emissions) -> ViewState {
    emissions.borrow().last().cloned().expect("expected an emission")
}

// ===== Scenarios =====

#[test]
fn waveform_session_from_load_to_progress() {
    let factory = Rc::new(SimulatedFactory::new());
    let (mut sync, emissions, _clock) = create("track.mp3", DisplayMode::Waveform, &factory);
    let waveform = factory.last_waveform().unwrap();

    waveform.emit(WaveformEvent::Loading(40));
    let state = last(&emissions);
    assert!(state.loading);
    assert_eq!(state.load_progress, 40);

    waveform.emit(WaveformEvent::Ready { duration: 120.0 });
    let state = last(&emissions);
    assert!(!state.loading);
    assert_eq!(state.end_time, 120.0);

    sync.play();
    assert_eq!(waveform.commands().last(), Some(&Command::Play));
    assert!(!last(&emissions).playing);

    waveform.emit(WaveformEvent::Play);
    assert!(last(&emissions).playing);

    waveform.emit(WaveformEvent::AudioProcess(30.0));
    let state = last(&emissions);
    assert_eq!(state.current_time, 30.0);
    assert_eq!(state.position_percent, 25.0);
    assert!(state.playing);
}

#[test]
fn timeline_session_from_load_to_end() {
    let factory = Rc::new(SimulatedFactory::new());
    let (mut sync, emissions, clock) = create("track.mp3", DisplayMode::Timeline, &factory);
    let element = factory.last_media_element().unwrap();

    element.emit(MediaEvent::CanPlayThrough { duration: 60.0 });
    sync.play();
    element.emit(MediaEvent::Playing);

    clock.advance(Duration::from_millis(150));
    element.emit(MediaEvent::TimeUpdate { current_time: 45.0 });
    assert_eq!(last(&emissions).position_percent, 75.0);

    // Overshoot reported by the element is clamped
    clock.advance(Duration::from_millis(150));
    element.emit(MediaEvent::TimeUpdate { current_time: 60.4 });
    assert_eq!(last(&emissions).current_time, 60.0);

    element.emit(MediaEvent::Ended);
    let state = last(&emissions);
    assert!(!state.playing);
    assert_eq!(state.position_percent, 100.0);
}

#[test]
fn seek_before_ready_leaves_state_untouched() {
    let factory = Rc::new(SimulatedFactory::responsive());
    let (mut sync, emissions, _clock) = create("track.mp3", DisplayMode::Waveform, &factory);

    sync.seek(50.0);

    assert!(emissions.borrow().is_empty());
    assert_eq!(sync.state(), ViewState::fresh());
    assert!(!factory
        .last_waveform()
        .unwrap()
        .commands()
        .iter()
        .any(|c| matches!(c, Command::SeekTo(_))));
}

#[test]
fn loading_becomes_false_exactly_once() {
    let factory = Rc::new(SimulatedFactory::new());
    let (_sync, emissions, _clock) = create("track.mp3", DisplayMode::Waveform, &factory);
    let waveform = factory.last_waveform().unwrap();

    waveform.emit(WaveformEvent::Loading(10));
    waveform.emit(WaveformEvent::Ready { duration: 30.0 });
    waveform.emit(WaveformEvent::Loading(90));
    waveform.emit(WaveformEvent::Ready { duration: 30.0 });

    let transitions = emissions
        .borrow()
        .windows(2)
        .filter(|pair| pair[0].loading && !pair[1].loading)
        .count();
    assert_eq!(transitions, 1);
    assert!(emissions.borrow().iter().skip_while(|s| s.loading).all(|s| !s.loading));
}

#[test]
fn switching_mode_while_playing_tears_down_old_backend() {
    let factory = Rc::new(SimulatedFactory::new());
    let (mut sync, emissions, _clock) = create("track.mp3", DisplayMode::Waveform, &factory);
    let waveform = factory.last_waveform().unwrap();
    waveform.emit(WaveformEvent::Ready { duration: 90.0 });
    waveform.emit(WaveformEvent::Play);
    assert!(sync.state().playing);

    sync.set_mode(DisplayMode::Timeline);

    assert!(waveform.is_destroyed());
    assert_eq!(waveform.listener_count(), 0);
    let state = last(&emissions);
    assert!(state.loading);
    assert!(!state.playing);

    let element = factory.last_media_element().unwrap();
    assert_eq!(element.src(), "track.mp3");

    // Late events from the torn-down renderer are never observed
    let before = emissions.borrow().len();
    waveform.emit(WaveformEvent::AudioProcess(50.0));
    waveform.emit(WaveformEvent::Finish);
    assert_eq!(emissions.borrow().len(), before);
    assert_eq!(sync.state(), ViewState::fresh());

    // And back again
    sync.set_mode(DisplayMode::Waveform);
    assert!(element.is_released());
    assert_eq!(element.listener_count(), 0);
    assert_eq!(factory.waveforms().len(), 2);
    assert!(last(&emissions).loading);
}

#[test]
fn listener_kept_by_a_misbehaving_backend_is_ignored_after_switch() {
    use std::cell::Cell;
    use tuneline_playback::backend::{
        BackendFactory, ListenerId, MediaElementBackend, MediaListener, WaveformBackend,
    };
    use tuneline_playback::events::MediaEventKind;
    use tuneline_playback::WaveformOptions;

    // Element that ignores remove_event_listener and leaks its listeners
    struct LeakyElement {
        leaked: Rc<RefCell<Vec<MediaListener>>>,
    }

    impl MediaElementBackend for LeakyElement {
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn set_current_time(&mut self, _time: f64) {}
        fn current_time(&self) -> f64 {
            0.0
        }
        fn duration(&self) -> f64 {
            f64::NAN
        }
        fn add_event_listener(&mut self, _kind: MediaEventKind, listener: MediaListener) -> ListenerId {
            self.leaked.borrow_mut().push(listener);
            ListenerId(self.leaked.borrow().len() as u64)
        }
        fn remove_event_listener(&mut self, _id: ListenerId) {}
        fn release(&mut self) {}
    }

    struct LeakyFactory {
        leaked: Rc<RefCell<Vec<MediaListener>>>,
        created: Cell<usize>,
    }

    impl BackendFactory for LeakyFactory {
        fn waveform(
            &self,
            _options: &WaveformOptions,
        ) -> tuneline_playback::Result<Box<dyn WaveformBackend>> {
            Err(PlayerError::Backend("unsupported".to_string()))
        }

        fn media_element(&self, _src: &str) -> tuneline_playback::Result<Box<dyn MediaElementBackend>> {
            self.created.set(self.created.get() + 1);
            Ok(Box::new(LeakyElement {
                leaked: Rc::clone(&self.leaked),
            }))
        }
    }

    let leaked = Rc::new(RefCell::new(Vec::new()));
    let factory = Rc::new(LeakyFactory {
        leaked: Rc::clone(&leaked),
        created: Cell::new(0),
    });
    let emissions: Emissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emissions);
    let mut sync = Synchronizer::create("a.mp3", DisplayMode::Timeline, factory.clone(), move |s| {
        sink.borrow_mut().push(s.clone())
    });

    let stale: Vec<MediaListener> = leaked.borrow().clone();
    sync.set_source("b.mp3", DisplayMode::Timeline);
    assert_eq!(factory.created.get(), 2);
    let before = emissions.borrow().len();

    for listener in &stale {
        listener(MediaEvent::CanPlayThrough { duration: 10.0 });
        listener(MediaEvent::Playing);
    }

    assert_eq!(emissions.borrow().len(), before);
    assert!(sync.state().loading);

    // Listeners outliving the synchronizer are harmless too
    drop(sync);
    for listener in &stale {
        listener(MediaEvent::Error("late".to_string()));
    }
    assert_eq!(emissions.borrow().len(), before);
}

#[test]
fn destroy_twice_is_silent() {
    let factory = Rc::new(SimulatedFactory::responsive());
    let (mut sync, emissions, _clock) = create("track.mp3", DisplayMode::Timeline, &factory);
    let element = factory.last_media_element().unwrap();
    element.emit(MediaEvent::CanPlayThrough { duration: 10.0 });
    sync.play();
    let before = emissions.borrow().len();

    sync.destroy();
    sync.destroy();
    sync.play();
    sync.seek(20.0);
    element.emit(MediaEvent::TimeUpdate { current_time: 3.0 });

    assert_eq!(emissions.borrow().len(), before);
    assert!(sync.is_destroyed());
    assert!(!sync.state().playing);
}

#[test]
fn responsive_seek_lands_on_requested_time() {
    let factory = Rc::new(SimulatedFactory::responsive());
    let (mut sync, emissions, _clock) = create("track.mp3", DisplayMode::Waveform, &factory);
    factory
        .last_waveform()
        .unwrap()
        .emit(WaveformEvent::Ready { duration: 240.0 });

    sync.seek(75.0);

    let state = last(&emissions);
    assert!((state.current_time - 180.0).abs() < 1e-9);
    assert!((state.position_percent - 75.0).abs() < 1e-9);
}

#[test]
fn backend_error_can_be_retried_with_set_source() {
    let factory = Rc::new(SimulatedFactory::new());
    let (mut sync, emissions, _clock) = create("broken.mp3", DisplayMode::Timeline, &factory);
    factory
        .last_media_element()
        .unwrap()
        .emit(MediaEvent::Error("MEDIA_ERR_SRC_NOT_SUPPORTED".to_string()));

    let state = last(&emissions);
    assert!(state.loading);
    assert!(matches!(state.error, Some(PlayerError::Backend(_))));

    sync.set_source("fixed.mp3", DisplayMode::Timeline);
    let state = last(&emissions);
    assert!(state.error.is_none());
    assert_eq!(factory.last_media_element().unwrap().src(), "fixed.mp3");
}

#[test]
fn view_follows_emitted_states() {
    let factory = Rc::new(SimulatedFactory::responsive());
    let config = PlayerConfig {
        display: DisplayMode::Timeline,
        inline: true,
        ..PlayerConfig::default()
    };
    let views = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&views);
    let view_config = config.clone();
    let mut sync = Synchronizer::with_options(
        "track.mp3",
        config.display,
        factory.clone(),
        config.sync_options(),
        Rc::new(ManualClock::new()),
        move |state: &ViewState| sink.borrow_mut().push(PlayerView::render(&view_config, state)),
    );

    factory
        .last_media_element()
        .unwrap()
        .emit(MediaEvent::CanPlayThrough { duration: 100.0 });
    sync.play();
    sync.seek(10.0);

    let views = views.borrow();
    let view = views.last().unwrap();
    assert!(view.play_button.enabled);
    assert_eq!(view.play_button.icon, tuneline_playback::view::ButtonIcon::Pause);
    assert_eq!(view.track, tuneline_playback::view::Track::Slider { position: 10.0 });
    assert_eq!(view.elapsed.as_deref(), Some("00:10"));
    assert_eq!(view.total.as_deref(), Some("01:40"));
}

#[test]
fn failed_backend_construction_disables_play_button() {
    let factory = Rc::new(SimulatedFactory::new());
    factory.fail_with("no renderer");
    let (mut sync, emissions, _clock) = create("track.mp3", DisplayMode::Waveform, &factory);

    assert!(sync.is_inert());
    let state = last(&emissions);
    let view = PlayerView::render(&PlayerConfig::default(), &state);
    assert!(!view.play_button.enabled);
    assert_eq!(view.error.as_deref(), Some("Backend error: no renderer"));

    factory.recover();
    sync.set_source("track.mp3", DisplayMode::Waveform);
    factory
        .last_waveform()
        .unwrap()
        .emit(WaveformEvent::Ready { duration: 30.0 });
    let view = PlayerView::render(&PlayerConfig::default(), &sync.state());
    assert!(view.play_button.enabled);
}

#[test]
fn waveform_backend_receives_configured_options() {
    let factory = Rc::new(SimulatedFactory::new());
    let config = PlayerConfig {
        id: "custom".to_string(),
        wave_color: Some("green".to_string()),
        wave_height: 64,
        plugins: vec!["regions".to_string()],
        ..PlayerConfig::default()
    };
    let _sync = Synchronizer::with_options(
        "track.mp3",
        DisplayMode::Waveform,
        factory.clone(),
        config.sync_options(),
        Rc::new(ManualClock::new()),
        |_: &ViewState| {},
    );

    let options = factory.last_waveform().unwrap().options();
    assert_eq!(options.container, "custom");
    assert_eq!(options.wave_color, "green");
    assert_eq!(options.height, 64);
    assert_eq!(options.plugins, vec!["regions".to_string()]);
}
