use audiolab::{voices::InstrumentPreset, AudioLab, LabConfig, Studio};
use float_cmp::approx_eq;
use oorandom::Rand32;

fn config() -> LabConfig {
    LabConfig::new()
        .sample_rate(1_000.0)
        .master_amplitude(1.0)
        .record_duration(1.0)
        .cell_duration(0.125)
        .rows(12)
        .clips(2)
}

fn render(lab: &mut AudioLab, frames: usize) -> Vec<f32> {
    let mut block = vec![0.0; frames];
    lab.render_block(&mut block);
    block
}

// Center of a piano roll cell in the default 24x16 px geometry.
fn cell(column: u32, row: u32) -> (f32, f32) {
    (column as f32 * 24.0 + 12.0, row as f32 * 16.0 + 8.0)
}

#[test]
fn renders_silence_with_empty_scene() {
    let (_studio, mut lab) = Studio::new(config()).unwrap();
    let samples = render(&mut lab, 512);
    assert!(samples.iter().all(|s| *s == 0.0));
}

#[test]
fn master_mix_stays_in_range_under_load() {
    let (mut studio, mut lab) = Studio::new(config()).unwrap();
    studio.set_preset(0, InstrumentPreset::Harmonica).unwrap();
    for column in 0..8 {
        let (x, y) = cell(column, column % 3);
        studio.mouse_press(x, y);
        studio.mouse_release();
    }
    studio.play_clip(0).unwrap();
    for code in *b"ZSXDCVGBHNJM" {
        studio.key_down(code as u32).unwrap();
    }

    for _ in 0..4 {
        let block = render(&mut lab, 256);
        assert!(block.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}

#[test]
fn sine_key_crosses_zero_once_per_period() {
    let config = LabConfig::new()
        .sample_rate(44_000.0)
        .master_amplitude(1.0)
        .clips(1);
    let (mut studio, mut lab) = Studio::new(config).unwrap();
    // Base preset is one sine partial; make it sustain at full level at once.
    for (parameter, value) in [(0, 0.0), (1, 0.0), (3, 1.0), (4, 1.0)] {
        assert!(studio.set_parameter(0, parameter, value).unwrap());
    }
    studio.key_down('Z' as u32).unwrap();

    let block = render(&mut lab, 101);
    assert_eq!(block[0], 0.0);
    assert!(approx_eq!(f32, block[100], 0.0, epsilon = 1e-3));
    assert!(approx_eq!(f32, block[25], 1.0, epsilon = 1e-3));
}

#[test]
fn immediate_release_lasts_exactly_the_release_time() {
    let (mut studio, mut lab) = Studio::new(config()).unwrap();
    studio.key_down('Z' as u32).unwrap();
    studio.key_up('Z' as u32).unwrap();

    // Base release is 0.2 s, fading from the sustain level
    let tail = render(&mut lab, 200);
    assert!(tail[..100].iter().any(|s| s.abs() > 0.3));
    assert_eq!(lab.live_notes().len(), 1);
    assert!(lab.live_notes()[0].is_released());
    render(&mut lab, 1);
    assert!(lab.live_notes().is_empty());
}

#[test]
fn clicking_a_cell_twice_changes_nothing() {
    let (mut studio, _lab) = Studio::new(config()).unwrap();
    let (x, y) = cell(2, 2);
    studio.mouse_press(x, y);
    studio.mouse_release();
    let before: Vec<u32> = studio.current_clip().unwrap().notes().map(|(h, _)| h).collect();

    let (x, y) = cell(5, 7);
    studio.mouse_press(x, y);
    studio.mouse_release();
    studio.mouse_press(x, y);
    studio.mouse_release();

    let after: Vec<u32> = studio.current_clip().unwrap().notes().map(|(h, _)| h).collect();
    assert_eq!(before, after);
}

#[test]
fn random_resizing_keeps_notes_well_formed() {
    let (mut studio, _lab) = Studio::new(config()).unwrap();
    for column in [1, 3, 4, 6] {
        let (x, y) = cell(column, 0);
        studio.mouse_press(x, y);
        studio.mouse_release();
    }

    let mut rng = Rand32::new(7);
    for _ in 0..200 {
        // Grab on an edge, drag somewhere (sometimes off the grid), let go
        let edge = rng.rand_range(0..9) as f32 * 24.0;
        studio.mouse_press(edge, 8.0);
        for _ in 0..4 {
            let x = rng.rand_float() * 300.0 - 50.0;
            studio.mouse_drag(x, 8.0);
        }
        studio.mouse_release();
    }

    let clip = studio.current_clip().unwrap();
    for (hash, note) in clip.notes() {
        assert!(note.end_time >= note.start_time);
        assert!(note.start_time >= 0.0 && note.end_time <= clip.record_duration());
        let (column, row) = clip.cell(hash);
        assert_eq!(row, 0);
        assert_eq!(column as i64, clip.column_at(note.start_time));
    }
}

#[test]
fn clip_playback_stops_at_the_end() {
    let (mut studio, mut lab) = Studio::new(config()).unwrap();
    let (x, y) = cell(0, 4);
    studio.mouse_press(x, y);
    studio.mouse_release();

    studio.play_clip(0).unwrap();
    render(&mut lab, 600);
    assert!(studio.is_clip_playing(0));
    render(&mut lab, 600);
    assert!(!studio.is_clip_playing(0));
    assert!(render(&mut lab, 64).iter().all(|s| *s == 0.0));
}

#[test]
fn arrangement_plays_all_clips_together_then_stops() {
    let (mut studio, mut lab) = Studio::new(config().master_amplitude(0.25)).unwrap();
    let (x, y) = cell(0, 4);
    studio.mouse_press(x, y);
    studio.mouse_release();
    studio.select_clip(1).unwrap();
    let (x, y) = cell(2, 7);
    studio.mouse_press(x, y);
    studio.mouse_release();

    studio.play_arrangement().unwrap();
    let mut mixed = render(&mut lab, 999);
    assert!(studio.is_arrangement_playing());
    // One record duration, not one per clip
    mixed.extend(render(&mut lab, 1));
    assert!(!studio.is_arrangement_playing());

    let first = studio.arrangement().clip(0).unwrap().render();
    let second = studio.arrangement().clip(1).unwrap().render();
    for i in 0..mixed.len() {
        assert_eq!(mixed[i], (first[i] + second[i]) * 0.25, "sample {i}");
    }
    assert!(render(&mut lab, 64).iter().all(|s| *s == 0.0));
}

#[test]
fn stopping_the_arrangement_brings_clips_back() {
    let (mut studio, mut lab) = Studio::new(config()).unwrap();
    let (x, y) = cell(0, 0);
    studio.mouse_press(x, y);
    studio.mouse_release();

    studio.play_arrangement().unwrap();
    studio.play_clip(0).unwrap();
    // Clip voices are muted while the mix-down runs
    let muted = render(&mut lab, 50);
    studio.stop_arrangement().unwrap();
    let clip = render(&mut lab, 50);

    let expected = studio.current_clip().unwrap().render();
    assert_eq!(&muted[..], &expected[..50]);
    assert_eq!(&clip[..], &expected[..50]);
}
