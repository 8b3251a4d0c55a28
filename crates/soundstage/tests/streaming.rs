//! End-to-end tests of the spatializer: audio in through the public API, compared against a convolution done in one
//! go.
use std::io::Write;

use soundstage::datasets::{DatasetPaths, Ear, HrirTable, FILTER_LEN};
use soundstage::dsp::close_floats::close_slices32;
use soundstage::dsp::views::*;
use soundstage::{Direction, Spatializer};

const BLOCK_SIZE: usize = 200;
const SUPER_BLOCK: usize = 2000;
const SIGNAL_LEN: usize = 4000;
const SR: f32 = 44100.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Something shaped vaguely like a real response: a decaying oscillation, different per ear and per direction.
fn synthetic_table() -> HrirTable {
    HrirTable::from_fn(|ear, az, el, tap| {
        let phase = match ear {
            Ear::Left => 0.3,
            Ear::Right => 1.1,
        };
        let t = tap as f32;
        let dir = (az.index() * 50 + el.index()) as f32 * 0.001;
        (0.2 * t + phase + dir).cos() * (-t / 40.0).exp() * 0.25
    })
}

fn sine(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / SR).sin())
        .collect()
}

fn reference(input: &[f32], impulse: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0f64; input.len() + impulse.len() - 1];
    for (i, x) in input.iter().enumerate() {
        for (j, h) in impulse.iter().enumerate() {
            out[i + j] += *x as f64 * *h as f64;
        }
    }
    out.into_iter().map(|x| x as f32).collect()
}

/// Run a mono signal through, in blocks of the given sizes (cycled), followed by enough silence to flush it out.
fn render(spatializer: &mut Spatializer, signal: &[f32], block_sizes: &[usize]) -> [Vec<f32>; 2] {
    let total = signal.len() + spatializer.latency_frames();
    let mut input: Vec<f32> = signal.iter().flat_map(|x| [*x, *x]).collect();
    input.resize(total * 2, 0.0);
    let mut output = vec![f32::NAN; input.len()];

    let mut done = 0;
    let mut sizes = block_sizes.iter().copied().cycle();
    while done < total {
        let frames = sizes.next().unwrap().min(total - done);
        spatializer.process(
            &ImmutableSliceView::new(&input[done * 2..(done + frames) * 2], 2),
            &mut MutableSliceView::<_, false>::new(&mut output[done * 2..(done + frames) * 2], 2),
        );
        done += frames;
    }

    let left = output.iter().copied().step_by(2).collect();
    let right = output.iter().copied().skip(1).step_by(2).collect();
    [left, right]
}

fn check_against_reference(got: &[Vec<f32>; 2], signal: &[f32], table: &HrirTable, direction: Direction) {
    let bins = soundstage::angle_mapper::select_bins(direction);

    for ear in Ear::ALL {
        let channel = &got[ear.channel()];
        assert!(channel[..SUPER_BLOCK].iter().all(|x| *x == 0.0), "{ear} ear has output before the latency");

        let expected = reference(signal, table.get(ear, bins.azimuth, bins.elevation));
        close_slices32(&channel[SUPER_BLOCK..], &expected[..signal.len()], 1e-3);
    }
}

#[test]
fn sine_is_delayed_by_one_super_block() {
    init_logging();

    let table = synthetic_table();
    let mut spatializer = Spatializer::new(Some(table.clone()), BLOCK_SIZE).unwrap();
    assert_eq!(spatializer.latency_frames(), SUPER_BLOCK);

    let signal = sine(SIGNAL_LEN);
    let got = render(&mut spatializer, &signal, &[BLOCK_SIZE]);
    check_against_reference(&got, &signal, &table, Direction::new(0.0, 0.0));

    let bins = spatializer.last_bins().unwrap();
    assert_eq!((bins.azimuth.angle(), bins.elevation.angle()), (0.0, 0.0));
}

#[test]
fn host_blocks_of_any_size_give_the_same_result() {
    init_logging();

    let table = synthetic_table();
    let signal = sine(SIGNAL_LEN);

    let mut regular = Spatializer::new(Some(table.clone()), BLOCK_SIZE).unwrap();
    let expected = render(&mut regular, &signal, &[BLOCK_SIZE]);

    let mut irregular = Spatializer::new(Some(table), BLOCK_SIZE).unwrap();
    let got = render(&mut irregular, &signal, &[1, 199, 7, 401, 1999, 2001, 13]);

    assert_eq!(got, expected);
}

#[test]
fn direction_is_honored() {
    init_logging();

    let table = synthetic_table();
    let direction = Direction::new(-130.0, 20.0);
    let mut spatializer = Spatializer::new(Some(table.clone()), BLOCK_SIZE).unwrap();
    spatializer.control().set_direction(direction);

    let signal = sine(SIGNAL_LEN);
    let got = render(&mut spatializer, &signal, &[BLOCK_SIZE]);
    check_against_reference(&got, &signal, &table, direction);
}

#[test]
fn no_dataset_means_silence() {
    init_logging();

    let mut spatializer = Spatializer::new(None, BLOCK_SIZE).unwrap();
    assert!(!spatializer.has_dataset());

    let got = render(&mut spatializer, &sine(SIGNAL_LEN), &[BLOCK_SIZE]);
    assert!(got.iter().all(|c| c.iter().all(|x| *x == 0.0)));
    assert!(spatializer.last_bins().is_none());
}

/// The text format round trips through the loader and ends up in the output.
#[test]
fn dataset_loaded_from_disk() {
    init_logging();

    let table = synthetic_table();
    let dir = std::env::temp_dir().join(format!("soundstage-streaming-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let paths = DatasetPaths::in_dir(&dir);

    for ear in Ear::ALL {
        let mut file = std::io::BufWriter::new(std::fs::File::create(paths.for_ear(ear)).unwrap());
        for az in 0..soundstage::datasets::AZIMUTH_BINS {
            for el in 0..soundstage::datasets::ELEVATION_BINS {
                let az = soundstage::datasets::AzimuthBin::new(az).unwrap();
                let el = soundstage::datasets::ElevationBin::new(el).unwrap();
                for c in table.get(ear, az, el) {
                    // Display for floats round trips exactly.
                    writeln!(file, "{}", c).unwrap();
                }
            }
        }
        file.flush().unwrap();
    }

    let mut spatializer = Spatializer::with_dataset(&paths, BLOCK_SIZE).unwrap();
    let signal = sine(SIGNAL_LEN);
    let got = render(&mut spatializer, &signal, &[BLOCK_SIZE]);
    check_against_reference(&got, &signal, &table, Direction::default());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn block_size_changes_restart_cleanly() {
    init_logging();

    let table = synthetic_table();
    let mut spatializer = Spatializer::new(Some(table.clone()), 64).unwrap();
    let _ = render(&mut spatializer, &sine(1000), &[64]);

    spatializer.set_block_size(BLOCK_SIZE).unwrap();
    assert_eq!(spatializer.latency_frames(), SUPER_BLOCK);

    // Nothing from before the change leaks through.
    let signal = sine(SIGNAL_LEN);
    let got = render(&mut spatializer, &signal, &[BLOCK_SIZE]);
    check_against_reference(&got, &signal, &table, Direction::default());
    assert!(got[0].len() >= SUPER_BLOCK + FILTER_LEN);
}
