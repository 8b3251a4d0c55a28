use std::io::BufRead;

use crate::{DatasetPaths, LoadError, AZIMUTH_ANGLES, AZIMUTH_BINS, ELEVATION_ANGLES, ELEVATION_BINS};

/// Number of taps in every impulse response.
pub const FILTER_LEN: usize = 200;

/// Number of coefficients stored for one ear: one impulse for every direction in the grid.
pub const COEFFICIENTS_PER_EAR: usize = AZIMUTH_BINS * ELEVATION_BINS * FILTER_LEN;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, derive_more::Display)]
pub enum Ear {
    #[display(fmt = "left")]
    Left,

    #[display(fmt = "right")]
    Right,
}

impl Ear {
    pub const ALL: [Ear; 2] = [Ear::Left, Ear::Right];

    /// The channel of a stereo signal which is heard by this ear.
    pub fn channel(&self) -> usize {
        match self {
            Ear::Left => 0,
            Ear::Right => 1,
        }
    }
}

/// An index into the azimuths of the measurement grid.
///
/// Can only hold in-range values.  The spatializer produces these from angles by nearest-neighbor search.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct AzimuthBin(usize);

/// An index into the elevations of the measurement grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElevationBin(usize);

impl AzimuthBin {
    pub fn new(index: usize) -> Option<AzimuthBin> {
        (index < AZIMUTH_BINS).then_some(AzimuthBin(index))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// The measured azimuth of this bin, in degrees.
    pub fn angle(&self) -> f32 {
        AZIMUTH_ANGLES[self.0]
    }
}

impl ElevationBin {
    pub fn new(index: usize) -> Option<ElevationBin> {
        (index < ELEVATION_BINS).then_some(ElevationBin(index))
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// The measured elevation of this bin, in degrees.
    pub fn angle(&self) -> f32 {
        ELEVATION_ANGLES[self.0]
    }
}

/// A dataset of head-related impulse responses: for each ear, one [FILTER_LEN]-tap impulse per direction of the grid.
///
/// Coefficients are stored flat in `[azimuth][elevation][tap]` order, which is also the order of the text files.
/// Tables are immutable once built.
#[derive(Clone)]
pub struct HrirTable {
    left: Box<[f32]>,
    right: Box<[f32]>,
}

/// Parse the number at the start of a line, ignoring leading whitespace and anything after the number.
///
/// So `0.25`, ` 0.25\r`, `1.5f` and `0.25,` all parse.  Returns `None` if the line doesn't start with a finite number.
fn parse_leading_float(line: &str) -> Option<f32> {
    let line = line.trim_start();
    let candidate_len = line
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(line.len());

    // The candidate may end in something which isn't part of the number, for example the `e` of `1e`.
    (1..=candidate_len)
        .rev()
        .find_map(|len| line[..len].parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

/// Parse one ear's worth of coefficients, one per line.
///
/// Lines which don't start with a finite float, including lines which aren't UTF-8, load as 0.  Lines past the
/// expected count are ignored.  Too few lines is an error, as is failing to read.
fn parse_ear(reader: impl BufRead, ear: Ear) -> Result<Box<[f32]>, LoadError> {
    let mut coefficients = Vec::with_capacity(COEFFICIENTS_PER_EAR);
    let mut malformed = 0usize;
    let mut extra = 0usize;

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|source| LoadError::Read { ear, source })?;

        if coefficients.len() == COEFFICIENTS_PER_EAR {
            extra += 1;
            continue;
        }

        let value = match std::str::from_utf8(&line).ok().and_then(parse_leading_float) {
            Some(v) => v,
            None => {
                log::trace!(
                    "{ear} ear dataset: line {} is not a number: {:?}",
                    line_no + 1,
                    String::from_utf8_lossy(&line)
                );
                malformed += 1;
                0.0
            }
        };

        coefficients.push(value);
    }

    if coefficients.len() != COEFFICIENTS_PER_EAR {
        return Err(LoadError::WrongCoefficientCount {
            ear,
            expected: COEFFICIENTS_PER_EAR,
            found: coefficients.len(),
        });
    }

    if malformed != 0 {
        log::warn!("{ear} ear dataset: {malformed} lines could not be parsed and were replaced with 0");
    }

    if extra != 0 {
        log::debug!("{ear} ear dataset: ignoring {extra} trailing lines");
    }

    Ok(coefficients.into_boxed_slice())
}

impl HrirTable {
    /// Load the table from the two text files of a dataset.
    pub fn load(paths: &DatasetPaths) -> Result<HrirTable, LoadError> {
        let open = |ear: Ear| {
            let path = paths.for_ear(ear);
            std::fs::File::open(path)
                .map(std::io::BufReader::new)
                .map_err(|source| LoadError::Open {
                    ear,
                    path: path.to_path_buf(),
                    source,
                })
        };

        let table = Self::from_readers(open(Ear::Left)?, open(Ear::Right)?)?;
        log::info!(
            "Loaded HRIR dataset from {} and {}",
            paths.left.display(),
            paths.right.display()
        );
        Ok(table)
    }

    /// Build a table from the text of each ear.
    pub fn from_readers(left: impl BufRead, right: impl BufRead) -> Result<HrirTable, LoadError> {
        Ok(HrirTable {
            left: parse_ear(left, Ear::Left)?,
            right: parse_ear(right, Ear::Right)?,
        })
    }

    /// Build a table from flat coefficient vectors in `[azimuth][elevation][tap]` order.
    ///
    /// Each must have exactly [COEFFICIENTS_PER_EAR] entries.
    pub fn from_coefficients(left: Vec<f32>, right: Vec<f32>) -> Result<HrirTable, LoadError> {
        for (ear, coefficients) in [(Ear::Left, &left), (Ear::Right, &right)] {
            if coefficients.len() != COEFFICIENTS_PER_EAR {
                return Err(LoadError::WrongCoefficientCount {
                    ear,
                    expected: COEFFICIENTS_PER_EAR,
                    found: coefficients.len(),
                });
            }
        }

        Ok(HrirTable {
            left: left.into_boxed_slice(),
            right: right.into_boxed_slice(),
        })
    }

    /// Build a table by asking a closure for every coefficient.
    ///
    /// The closure receives the ear, the direction, and the tap index.  Mostly useful for synthetic tables.
    pub fn from_fn(mut coefficient: impl FnMut(Ear, AzimuthBin, ElevationBin, usize) -> f32) -> HrirTable {
        let mut build = |ear: Ear| {
            let mut out = Vec::with_capacity(COEFFICIENTS_PER_EAR);
            for az in 0..AZIMUTH_BINS {
                for elev in 0..ELEVATION_BINS {
                    for tap in 0..FILTER_LEN {
                        out.push(coefficient(ear, AzimuthBin(az), ElevationBin(elev), tap));
                    }
                }
            }
            out.into_boxed_slice()
        };

        let left = build(Ear::Left);
        let right = build(Ear::Right);
        HrirTable { left, right }
    }

    /// Get the impulse for one ear in the given direction.
    ///
    /// The returned slice is always exactly [FILTER_LEN] long.
    pub fn get(&self, ear: Ear, azimuth: AzimuthBin, elevation: ElevationBin) -> &[f32] {
        let start = (azimuth.0 * ELEVATION_BINS + elevation.0) * FILTER_LEN;
        let coefficients = match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        };
        &coefficients[start..start + FILTER_LEN]
    }
}

impl std::fmt::Debug for HrirTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HrirTable")
            .field("azimuths", &AZIMUTH_BINS)
            .field("elevations", &ELEVATION_BINS)
            .field("filter_len", &FILTER_LEN)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    /// Text for one ear in which every coefficient is its own flat index, scaled down to keep the numbers short.
    fn counting_text(scale: f32) -> String {
        let mut out = String::new();
        for i in 0..COEFFICIENTS_PER_EAR {
            out.push_str(&format!("{}\n", i as f32 * scale));
        }
        out
    }

    fn bins(az: usize, elev: usize) -> (AzimuthBin, ElevationBin) {
        (AzimuthBin::new(az).unwrap(), ElevationBin::new(elev).unwrap())
    }

    #[test]
    fn test_row_major_layout() {
        let left = counting_text(1.0);
        let right = counting_text(-1.0);
        let table = HrirTable::from_readers(left.as_bytes(), right.as_bytes()).unwrap();

        let (az, elev) = bins(3, 7);
        let start = (3 * ELEVATION_BINS + 7) * FILTER_LEN;
        let expected_left = (start..start + FILTER_LEN).map(|i| i as f32).collect::<Vec<_>>();
        let expected_right = expected_left.iter().map(|x| -x).collect::<Vec<_>>();

        assert_eq!(table.get(Ear::Left, az, elev), &expected_left[..]);
        assert_eq!(table.get(Ear::Right, az, elev), &expected_right[..]);
    }

    #[test]
    fn malformed_lines_become_zero() {
        let mut lines = vec!["0.5".to_string(); COEFFICIENTS_PER_EAR];
        lines[0] = "garbage".into();
        lines[1] = "".into();
        lines[2] = "nan".into();
        lines[3] = "  0.25\r".into();
        let text = lines.join("\n");

        let table = HrirTable::from_readers(text.as_bytes(), text.as_bytes()).unwrap();
        let (az, elev) = bins(0, 0);
        assert_eq!(&table.get(Ear::Left, az, elev)[..5], &[0.0, 0.0, 0.0, 0.25, 0.5]);
    }

    #[test]
    fn lines_which_are_not_utf8_become_zero() {
        let mut text = "0.5\n".repeat(COEFFICIENTS_PER_EAR).into_bytes();
        text[0] = 0xff;

        let table = HrirTable::from_readers(&text[..], &text[..]).unwrap();
        let (az, elev) = bins(0, 0);
        assert_eq!(&table.get(Ear::Left, az, elev)[..2], &[0.0, 0.5]);
        assert_eq!(&table.get(Ear::Right, az, elev)[..2], &[0.0, 0.5]);
    }

    #[test]
    fn read_failures_are_still_errors() {
        struct Failing;

        impl std::io::Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
            }
        }

        let good = counting_text(1.0);
        match HrirTable::from_readers(good.as_bytes(), std::io::BufReader::new(Failing)) {
            Err(LoadError::Read { ear, .. }) => assert_eq!(ear, Ear::Right),
            x => panic!("Expected a read error, got {x:?}"),
        }
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("0.25"), Some(0.25));
        assert_eq!(parse_leading_float("  -1.5\r"), Some(-1.5));
        assert_eq!(parse_leading_float("1.5f"), Some(1.5));
        assert_eq!(parse_leading_float("0.25,"), Some(0.25));
        assert_eq!(parse_leading_float("2e-3 trailing"), Some(0.002));
        assert_eq!(parse_leading_float("3e"), Some(3.0));
        assert_eq!(parse_leading_float("1-2"), Some(1.0));
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("garbage"), None);
        assert_eq!(parse_leading_float("nan"), None);
        assert_eq!(parse_leading_float("1e999"), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn too_few_lines_is_an_error() {
        let good = counting_text(1.0);
        let short = "1.0\n".repeat(COEFFICIENTS_PER_EAR - 1);

        match HrirTable::from_readers(good.as_bytes(), short.as_bytes()) {
            Err(LoadError::WrongCoefficientCount {
                ear,
                expected,
                found,
            }) => {
                assert_eq!(ear, Ear::Right);
                assert_eq!(expected, COEFFICIENTS_PER_EAR);
                assert_eq!(found, COEFFICIENTS_PER_EAR - 1);
            }
            x => panic!("Expected a count error, got {x:?}"),
        }
    }

    #[test]
    fn trailing_lines_are_ignored() {
        let mut text = counting_text(1.0);
        text.push_str("12345\n6789\n");
        let table = HrirTable::from_readers(text.as_bytes(), text.as_bytes()).unwrap();

        let (az, elev) = bins(AZIMUTH_BINS - 1, ELEVATION_BINS - 1);
        let last = table.get(Ear::Left, az, elev)[FILTER_LEN - 1];
        assert_eq!(last, (COEFFICIENTS_PER_EAR - 1) as f32);
    }

    #[test]
    fn from_coefficients_checks_length() {
        let ok = vec![0.0; COEFFICIENTS_PER_EAR];
        assert!(HrirTable::from_coefficients(ok.clone(), ok.clone()).is_ok());
        assert!(matches!(
            HrirTable::from_coefficients(vec![0.0; 3], ok),
            Err(LoadError::WrongCoefficientCount { ear: Ear::Left, found: 3, .. })
        ));
    }

    #[test]
    fn from_fn_visits_every_direction() {
        let table = HrirTable::from_fn(|ear, az, elev, tap| {
            let sign = if ear == Ear::Left { 1.0 } else { -1.0 };
            sign * (az.index() * 10_000 + elev.index() * 100 + tap) as f32
        });

        let (az, elev) = bins(24, 49);
        assert_eq!(table.get(Ear::Left, az, elev)[199], 245_099.0);
        assert_eq!(table.get(Ear::Right, az, elev)[0], -244_900.0);
    }

    #[test]
    fn out_of_range_bins_do_not_exist() {
        assert!(AzimuthBin::new(AZIMUTH_BINS).is_none());
        assert!(ElevationBin::new(ELEVATION_BINS).is_none());
        assert_eq!(AzimuthBin::new(12).unwrap().angle(), 0.0);
        assert_eq!(ElevationBin::new(8).unwrap().angle(), 0.0);
    }

    #[test]
    fn load_from_disk() {
        let dir = std::env::temp_dir().join(format!("soundstage_datasets_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = DatasetPaths::in_dir(&dir);
        std::fs::write(&paths.left, counting_text(1.0)).unwrap();
        std::fs::write(&paths.right, counting_text(2.0)).unwrap();

        let table = HrirTable::load(&paths).unwrap();
        let (az, elev) = bins(0, 1);
        assert_eq!(table.get(Ear::Right, az, elev)[0], 400.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let paths = DatasetPaths::in_dir("/this/directory/does/not/exist");
        match HrirTable::load(&paths) {
            Err(LoadError::Open { ear, path, .. }) => {
                assert_eq!(ear, Ear::Left);
                assert_eq!(path, paths.left);
            }
            x => panic!("Expected an open error, got {x:?}"),
        }
    }
}
