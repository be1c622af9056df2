//! Writes synthetic wide-form projection CSVs into `data/` so the dashboard
//! can be exercised without the real KOSIS exports.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const AGE_BANDS: [&str; 21] = [
    "0 0 4세", "5 0 9세", "10 0 14세", "15 0 19세",
    "20 0 24세", "25 0 29세", "30 0 34세", "35 0 39세",
    "40 0 44세", "45 0 49세", "50 0 54세", "55 0 59세",
    "60 0 64세", "65 0 69세", "70 0 74세", "75 0 79세",
    "80 0 84세", "85 0 89세", "90 0 94세", "95 0 99세", "100세 이상",
];

const SEXES: [&str; 2] = ["남자", "여자"];

const REGIONS: [&str; 8] = [
    "서울특별시", "부산광역시", "대구광역시", "인천광역시",
    "경기도", "강원도", "전라남도", "경상북도",
];

const YEARS: std::ops::RangeInclusive<i32> = 2022..=2052;

/// Per-scenario growth factor applied per projection year.
fn scenario_drift(scenario: &str) -> f64 {
    match scenario {
        "고위" => 1.004,
        "저위" => 0.988,
        _ => 0.996,
    }
}

/// Baseline count (thousands of people) for an age band, a loose bell over
/// the working ages.
fn band_base(band_idx: usize) -> f64 {
    let centre = 9.0;
    let spread = 7.5;
    let x = (band_idx as f64 - centre) / spread;
    3800.0 * (-x * x).exp() + 120.0
}

/// One wide row of year cells for a fixed (scenario, sex, age) combination.
fn project_band(
    scenario: &str,
    sex_idx: usize,
    band_idx: usize,
    share: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    let drift = scenario_drift(scenario);
    // Slight male surplus at young ages, female surplus at old ages.
    let sex_skew = if sex_idx == 0 {
        1.03 - 0.004 * band_idx as f64
    } else {
        0.97 + 0.004 * band_idx as f64
    };
    let mut level = band_base(band_idx) * share * sex_skew * 0.5;

    YEARS
        .map(|_| {
            level *= drift;
            (level + rng.gauss(0.0, level * 0.01)).max(0.0).round()
        })
        .collect()
}

fn header(id_columns: &[&str]) -> Vec<String> {
    let mut row: Vec<String> = id_columns.iter().map(|c| c.to_string()).collect();
    row.extend(YEARS.map(|y| y.to_string()));
    row
}

/// Write one dataset: rows per (leading dims × sex × age band), with a `계`
/// row holding the per-year sums of its bands.
fn write_dataset(
    path: &str,
    id_columns: &[&str],
    leading_dims: &[Vec<&str>],
    share: f64,
    rng: &mut SimpleRng,
) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer
        .write_record(header(id_columns))
        .expect("Failed to write header");

    for dims in leading_dims {
        let scenario = dims[0];
        for (sex_idx, sex) in SEXES.iter().enumerate() {
            let bands: Vec<Vec<f64>> = (0..AGE_BANDS.len())
                .map(|band_idx| project_band(scenario, sex_idx, band_idx, share, rng))
                .collect();

            let year_count = bands[0].len();
            let totals: Vec<f64> = (0..year_count)
                .map(|year_idx| bands.iter().map(|row| row[year_idx]).sum())
                .collect();

            let mut write_row = |age: &str, cells: &[f64]| {
                let mut row: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                row.push(sex.to_string());
                row.push(age.to_string());
                row.extend(cells.iter().map(|v| format!("{v:.0}")));
                writer.write_record(row).expect("Failed to write row");
            };

            write_row("계", &totals);
            for (band_idx, cells) in bands.iter().enumerate() {
                write_row(AGE_BANDS[band_idx], cells);
            }
        }
    }

    writer.flush().expect("Failed to flush CSV");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let national = "data/성및연령별추계인구_전국_정리됨_cleaned.csv";
    let national_dims: Vec<Vec<&str>> =
        ["중위", "고위", "저위"].iter().map(|s| vec![*s]).collect();
    write_dataset(national, &["가정별", "성별", "연령"], &national_dims, 1.0, &mut rng);

    let provincial = "data/성및연령별추계인구_시도_정리됨_cleaned.csv";
    let mut provincial_dims: Vec<Vec<&str>> = Vec::new();
    for scenario in ["중위", "고위", "저위"] {
        for region in REGIONS {
            provincial_dims.push(vec![scenario, region]);
        }
    }
    write_dataset(
        provincial,
        &["시나리오별", "지역", "성별", "연령"],
        &provincial_dims,
        0.12,
        &mut rng,
    );

    let registry = serde_json::json!([
        {
            "label": "성 및 연령별 추계인구 (전국)",
            "file": "성및연령별추계인구_전국_정리됨_cleaned.csv",
            "id_columns": ["가정별", "성별", "연령"],
        },
        {
            "label": "성 및 연령별 추계인구 (시도)",
            "file": "성및연령별추계인구_시도_정리됨_cleaned.csv",
            "id_columns": ["시나리오별", "지역", "성별", "연령"],
        },
    ]);
    std::fs::write(
        "data/datasets.json",
        serde_json::to_string_pretty(&registry).expect("Failed to encode registry"),
    )
    .expect("Failed to write registry");

    let years = YEARS.count();
    println!(
        "Wrote {national} and {provincial} ({} age bands, {years} year columns each)",
        AGE_BANDS.len()
    );
}
