use approx::assert_abs_diff_eq;
use zcphase::capture::{
    CapturePort, ChannelConfig, Configure, Error, MicrosClock, Pull, SampleCell, ZcChannel,
    IMBALANCE_NO_DATA,
};
use zcphase::three_phase::{
    Near120Rule, Phase, SequenceVerdict, SwapRecommendation, ThreePhase, ThreePhaseConfig,
};

const PERIOD_50HZ_US: u32 = 20_000;
const COUNTER_HZ: u32 = 1_000_000;

/// Capture port for a board whose capture counter and clock are both 1MHz
#[derive(Default)]
struct BenchPort {
    now: u32,
}

impl MicrosClock for BenchPort {
    fn now_us(&self) -> u32 {
        self.now
    }
}

impl CapturePort for BenchPort {
    fn capture_value(&mut self) -> u32 {
        self.now
    }
    fn counter_frequency_hz(&self) -> u32 {
        COUNTER_HZ
    }
    fn reset_capture(&mut self) {}
    fn start_capture(&mut self) {}
    fn stop_capture(&mut self) {}
    fn configure_pull(&mut self, _pull: Pull) {}
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Feeds two edges one period apart into the channel, the second at `t_us`
fn feed(channel: &mut ZcChannel<'_, BenchPort>, t_us: u32, period_us: u32) {
    channel.port_mut().now = t_us.wrapping_sub(period_us);
    channel.on_capture().unwrap();
    channel.port_mut().now = t_us;
    channel.on_capture().unwrap();
}

struct Bench {
    cells: [SampleCell; 3],
}

impl Bench {
    fn new() -> Self {
        init_logging();
        Self { cells: [SampleCell::new(), SampleCell::new(), SampleCell::new()] }
    }

    /// Runs one edge pair per phase. `offsets_us` are relative to phase A's crossing
    fn run(&self, t_a: u32, offsets_us: [u32; 3], periods_us: [u32; 3]) {
        for i in 0..3 {
            let mut channel = ZcChannel::configure((
                BenchPort::default(),
                ChannelConfig::default(),
                &self.cells[i],
            ))
            .unwrap();
            channel.start();
            feed(&mut channel, t_a.wrapping_add(offsets_us[i]), periods_us[i]);
            assert!(channel.is_valid());
        }
    }

    fn analysis(&self) -> ThreePhase<'_> {
        let [a, b, c] = &self.cells;
        ThreePhase::configure((a, b, c, ThreePhaseConfig::default())).unwrap()
    }
}

#[test]
fn balanced_abc_supply_is_correct() {
    let bench = Bench::new();
    bench.run(100_000, [0, 6_667, 13_333], [PERIOD_50HZ_US; 3]);
    let mut tp = bench.analysis();

    assert_eq!(tp.process(), Ok(SequenceVerdict::Correct));
    assert!(tp.is_sequence_correct());
    assert_abs_diff_eq!(tp.phase_angle(Phase::A, Phase::B).unwrap(), 120., epsilon = 0.1);
    assert_abs_diff_eq!(tp.phase_angle(Phase::B, Phase::C).unwrap(), 120., epsilon = 0.1);
    assert_abs_diff_eq!(tp.phase_angle(Phase::C, Phase::A).unwrap(), 120., epsilon = 0.1);
    assert_abs_diff_eq!(tp.phase_angle(Phase::B, Phase::A).unwrap(), 240., epsilon = 0.1);
    assert_eq!(tp.phase_angle(Phase::C, Phase::C), Ok(0.));
    assert_eq!(tp.swap_recommendation(), Ok(SwapRecommendation::NONE));
    assert_eq!(tp.correction_message(), Ok("Phase sequence is correct (ABC)"));
    assert_eq!(tp.phase_frequency(Phase::B), Ok(50));
    assert!(tp.is_synchronized());
    assert!(tp.imbalance_percent() < 0.1);
    assert_eq!(tp.last_update_us(), 100_000);
}

#[test]
fn acb_supply_is_reversed_and_fixed_by_swapping_b_and_c() {
    let bench = Bench::new();
    bench.run(100_000, [0, 13_333, 6_667], [PERIOD_50HZ_US; 3]);
    let mut tp = bench.analysis();

    assert_eq!(tp.process(), Ok(SequenceVerdict::Reversed));
    assert!(!tp.is_sequence_correct());
    let swaps = tp.swap_recommendation().unwrap();
    assert!(swaps.swap_bc && !swaps.swap_ab && !swaps.swap_ca);
    assert_eq!(tp.correction_message(), Ok("Swap phases B and C to correct the sequence"));
}

#[test]
fn two_phases_on_one_conductor_is_an_error_without_a_swap() {
    let bench = Bench::new();
    bench.run(100_000, [0, 6_667, 6_667], [PERIOD_50HZ_US; 3]);
    let mut tp = bench.analysis();

    assert_eq!(tp.process(), Ok(SequenceVerdict::Error));
    assert_eq!(tp.swap_recommendation(), Ok(SwapRecommendation::NONE));
    assert_eq!(tp.correction_message(), Ok("Phase sequence error - check all connections"));
}

#[test]
fn skewed_angles_report_imbalance() {
    let bench = Bench::new();
    // 130, 120 and 110 degrees at 50Hz
    bench.run(100_000, [0, 7_222, 13_888], [PERIOD_50HZ_US; 3]);
    let mut tp = bench.analysis();

    assert_eq!(tp.process(), Ok(SequenceVerdict::Correct));
    assert_abs_diff_eq!(tp.imbalance_percent(), 5.56, epsilon = 0.05);
}

#[test]
fn one_hertz_apart_is_still_synchronized() {
    let bench = Bench::new();
    // 19.607ms truncates to 51Hz on B
    bench.run(100_000, [0, 6_667, 13_333], [PERIOD_50HZ_US, 19_607, PERIOD_50HZ_US]);
    let mut tp = bench.analysis();

    tp.process().unwrap();
    assert_eq!(tp.phase_frequency(Phase::B), Ok(51));
    assert!(tp.is_synchronized());
}

#[test]
fn a_faster_phase_is_not_synchronized() {
    let bench = Bench::new();
    // 52Hz on B is inside the 5% window but more than 1Hz off
    bench.run(100_000, [0, 6_667, 13_333], [PERIOD_50HZ_US, 19_230, PERIOD_50HZ_US]);
    let mut tp = bench.analysis();

    tp.process().unwrap();
    assert_eq!(tp.phase_frequency(Phase::A), Ok(50));
    assert_eq!(tp.phase_frequency(Phase::B), Ok(52));
    assert!(!tp.is_synchronized());
}

#[test]
fn crossings_either_side_of_clock_wrap() {
    let bench = Bench::new();
    bench.run(u32::MAX - 5_000, [0, 6_667, 13_333], [PERIOD_50HZ_US; 3]);
    let mut tp = bench.analysis();

    assert_eq!(tp.process(), Ok(SequenceVerdict::Correct));
    assert_abs_diff_eq!(tp.phase_angle(Phase::C, Phase::A).unwrap(), 120., epsilon = 0.1);
}

#[test]
fn missing_phase_invalidates_the_relationship() {
    let bench = Bench::new();
    bench.run(100_000, [0, 6_667, 13_333], [PERIOD_50HZ_US; 3]);
    let mut tp = bench.analysis();
    tp.process().unwrap();

    // C's opto drops out and its channel gets reset
    let mut c = ZcChannel::configure((
        BenchPort::default(),
        ChannelConfig::default(),
        &bench.cells[2],
    ))
    .unwrap();
    c.reset();

    assert_eq!(tp.process(), Err(Error::ChannelUnavailable(Phase::C)));
    assert!(!tp.relationship().valid);
    assert_eq!(tp.phase_angle(Phase::A, Phase::B), Err(Error::NotInitialized));
    assert_eq!(tp.imbalance_percent(), IMBALANCE_NO_DATA);
    assert!(!tp.is_synchronized());
    // The last verdict is kept until the next successful pass
    assert_eq!(tp.sequence(), SequenceVerdict::Correct);

    tp.reset();
    assert_eq!(tp.sequence(), SequenceVerdict::Unknown);
    assert_eq!(
        tp.correction_message(),
        Err(Error::NotInitialized),
    );
}

#[test]
fn inclusive_rule_reads_reversed_supply_as_correct() {
    let bench = Bench::new();
    bench.run(100_000, [0, 13_333, 6_667], [PERIOD_50HZ_US; 3]);
    let [a, b, c] = &bench.cells;
    let config = ThreePhaseConfig { near_120_rule: Near120Rule::Inclusive240, ..Default::default() };
    let mut tp = ThreePhase::configure((a, b, c, config)).unwrap();

    assert_eq!(tp.process(), Ok(SequenceVerdict::Correct));
}
