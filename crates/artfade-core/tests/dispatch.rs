mod common;

use std::sync::Arc;
use std::time::Duration;

use artfade_core::{
    Command, DispatchOutcome, FadeOutcome, LAST_CHANNEL, Status, controller_with_sink,
};
use common::{RecordingSink, config, distinct_steps};
use rand::SeedableRng;
use rand::rngs::StdRng;

const COLORS: [u16; 6] = [11, 12, 13, 21, 22, 23];

#[tokio::test(start_paused = true)]
async fn controller_sends_blackout_frame_on_start() {
    let sink = Arc::new(RecordingSink::default());
    let _dispatcher = controller_with_sink(&config(0), sink.clone()).unwrap();

    let frames = sink.frames();
    assert_eq!(frames.len(), 1);
    for channel in 1..=LAST_CHANNEL {
        let expected = if channel == 10 || channel == 20 { 40 } else { 0 };
        assert_eq!(frames[0].channel(channel), Some(expected), "channel {channel}");
    }
}

#[tokio::test(start_paused = true)]
async fn purple_raises_red_and_blue_only() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(0), sink.clone()).unwrap();

    let outcome = dispatcher.dispatch("purple");
    assert!(outcome.is_accepted());
    let fade = outcome.into_fade().expect("purple animates");
    assert_eq!(fade.wait().await, FadeOutcome::Completed);

    let engine = dispatcher.engine();
    for base in [10, 20] {
        assert_eq!(engine.get(base).unwrap(), 40);
        assert_eq!(engine.get(base + 1).unwrap(), 255);
        assert_eq!(engine.get(base + 2).unwrap(), 0);
        assert_eq!(engine.get(base + 3).unwrap(), 255);
    }
    assert_eq!(*dispatcher.subscribe().borrow(), Status::Active(Command::Purple));
}

#[tokio::test(start_paused = true)]
async fn yellow_raises_red_and_green_together() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(1), sink.clone()).unwrap();

    let fade = dispatcher.dispatch("yellow").into_fade().unwrap();
    assert_eq!(fade.wait().await, FadeOutcome::Completed);

    let last = sink.last().unwrap();
    assert_eq!(last.channel(11), Some(255));
    assert_eq!(last.channel(12), Some(255));
    assert_eq!(last.channel(13), Some(0));
    assert_eq!(sink.values(11), sink.values(22));
}

#[tokio::test(start_paused = true)]
async fn unrecognized_token_changes_nothing() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(0), sink.clone()).unwrap();
    let before = dispatcher.engine().snapshot();
    let frames_before = sink.len();

    let outcome = dispatcher.dispatch("foo");

    assert!(matches!(outcome, DispatchOutcome::Unrecognized(ref token) if token == "foo"));
    assert_eq!(dispatcher.engine().snapshot(), before);
    assert_eq!(sink.len(), frames_before);
    assert_eq!(*dispatcher.subscribe().borrow(), Status::Error("foo".to_string()));
}

#[tokio::test(start_paused = true)]
async fn blackout_cancels_running_color_fade() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(10), sink.clone()).unwrap();

    let red = dispatcher.dispatch("red").into_fade().unwrap();
    tokio::time::sleep(Duration::from_millis(35)).await;
    assert!(dispatcher.engine().get(11).unwrap() > 0);

    let outcome = dispatcher.dispatch("blackout");
    assert!(matches!(
        outcome,
        DispatchOutcome::Accepted {
            command: Command::Blackout,
            fade: None
        }
    ));
    assert_eq!(red.wait().await, FadeOutcome::Cancelled);

    let last = sink.last().unwrap();
    for channel in 1..=LAST_CHANNEL {
        let expected = if channel == 10 || channel == 20 { 40 } else { 0 };
        assert_eq!(last.channel(channel), Some(expected), "channel {channel}");
    }
}

#[tokio::test(start_paused = true)]
async fn new_color_replaces_running_color() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(10), sink.clone()).unwrap();

    let red = dispatcher.dispatch("red").into_fade().unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!red.is_finished());

    let blue = dispatcher.dispatch("blue").into_fade().unwrap();
    assert_eq!(red.wait().await, FadeOutcome::Cancelled);
    assert_eq!(blue.wait().await, FadeOutcome::Completed);

    let engine = dispatcher.engine();
    assert_eq!(engine.get(11).unwrap(), 0);
    assert_eq!(engine.get(21).unwrap(), 0);
    assert_eq!(engine.get(13).unwrap(), 255);
    assert_eq!(engine.get(23).unwrap(), 255);
}

#[tokio::test(start_paused = true)]
async fn fadeout_ramps_every_color_to_zero() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(0), sink.clone()).unwrap();
    dispatcher.dispatch("green").into_fade().unwrap().wait().await;

    let fade = dispatcher.dispatch("fadeout").into_fade().unwrap();
    assert_eq!(fade.channels(), &COLORS);
    assert_eq!(fade.wait().await, FadeOutcome::Completed);

    let engine = dispatcher.engine();
    for channel in COLORS {
        assert_eq!(engine.get(channel).unwrap(), 0);
    }
    assert_eq!(engine.get(10).unwrap(), 40);
}

#[tokio::test(start_paused = true)]
async fn random_moves_at_most_one_color_channel() {
    for seed in 0..8 {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = controller_with_sink(&config(0), sink.clone())
            .unwrap()
            .with_rng(StdRng::seed_from_u64(seed));

        let outcome = dispatcher.dispatch("random");
        let fade = outcome.into_fade().expect("random animates");
        assert_eq!(fade.channels().len(), 1);
        let channel = fade.channels()[0];
        assert!(COLORS.contains(&channel));
        assert_eq!(fade.wait().await, FadeOutcome::Completed);

        let engine = dispatcher.engine();
        for other in COLORS.into_iter().filter(|&c| c != channel) {
            assert_eq!(engine.get(other).unwrap(), 0);
        }
        let target = engine.get(channel).unwrap();
        assert_eq!(sink.len(), 1 + usize::from(target));
    }
}

#[tokio::test(start_paused = true)]
async fn random_does_not_cancel_other_channels() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(1), sink.clone())
        .unwrap()
        .with_rng(StdRng::seed_from_u64(42));

    let red = dispatcher.dispatch("red").into_fade().unwrap();
    let random = dispatcher.dispatch("random").into_fade().unwrap();
    let random_channel = random.channels()[0];

    let random_outcome = random.wait().await;
    let red_outcome = red.wait().await;

    assert_eq!(random_outcome, FadeOutcome::Completed);
    if [11, 21].contains(&random_channel) {
        assert_eq!(red_outcome, FadeOutcome::Cancelled);
    } else {
        assert_eq!(red_outcome, FadeOutcome::Completed);
        assert_eq!(dispatcher.engine().get(11).unwrap(), 255);
    }
}

#[tokio::test(start_paused = true)]
async fn dispatch_returns_while_fade_is_running() {
    let sink = Arc::new(RecordingSink::default());
    let dispatcher = controller_with_sink(&config(10), sink.clone()).unwrap();

    let fade = dispatcher.dispatch("green").into_fade().unwrap();
    assert!(!fade.is_finished());
    let second = dispatcher.dispatch("foo");
    assert!(!second.is_accepted());
    assert!(!fade.is_finished());
    assert_eq!(fade.wait().await, FadeOutcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn concurrent_random_fades_on_different_channels_both_complete() {
    for seed in 0..64 {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = controller_with_sink(&config(1), sink.clone())
            .unwrap()
            .with_rng(StdRng::seed_from_u64(seed));

        let first = dispatcher.dispatch("random").into_fade().unwrap();
        let second = dispatcher.dispatch("random").into_fade().unwrap();
        let (a, b) = (first.channels()[0], second.channels()[0]);
        if a == b {
            first.wait().await;
            second.wait().await;
            continue;
        }

        let (first, second) = tokio::join!(first.wait(), second.wait());
        assert_eq!(first, FadeOutcome::Completed);
        assert_eq!(second, FadeOutcome::Completed);

        let engine = dispatcher.engine();
        let (target_a, target_b) = (engine.get(a).unwrap(), engine.get(b).unwrap());
        for (channel, target) in [(a, target_a), (b, target_b)] {
            let steps = distinct_steps(&sink.values(channel))
                .into_iter()
                .skip_while(|&v| v == 0)
                .collect::<Vec<_>>();
            assert_eq!(steps, (1..=target).collect::<Vec<u8>>(), "channel {channel}");
        }
        assert_eq!(sink.len(), 1 + usize::from(target_a) + usize::from(target_b));
        return;
    }
    panic!("no seed picked two different channels");
}
