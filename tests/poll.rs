use std::cell::Cell;

use bitport::{
    poll::{ChangeDetector, InterruptMonitor, IrqState, Sampler},
    shift::InputShiftRegister,
};
use embedded_hal_mock::{
    pin::{Mock as PinMock, State, Transaction as PinTransaction},
    spi::{Mock as SpiMock, Transaction as SpiTransaction},
};

#[test]
fn sampler_waits_a_full_interval() {
    let _ = pretty_env_logger::try_init();
    let now = Cell::new(1_000u32);
    let mut sampler = Sampler::new(|| now.get(), 100);
    assert!(!sampler.ready());

    now.set(1_099);
    assert!(!sampler.ready());
    now.set(1_100);
    assert!(sampler.ready());
    // measured from the last sample
    assert!(!sampler.ready());
    now.set(1_250);
    assert!(sampler.ready());
    now.set(1_349);
    assert!(!sampler.ready());
}

#[test]
fn sampler_survives_wraparound() {
    let now = Cell::new(u32::MAX - 10);
    let mut sampler = Sampler::new(|| now.get(), 100);
    now.set(50);
    assert!(!sampler.ready());
    now.set(89);
    assert!(sampler.ready());
}

#[test]
fn sampler_rates() {
    let now = Cell::new(0u32);
    let sampler = Sampler::from_rate(|| now.get(), 0.2);
    assert_eq!(5_000, sampler.interval_ms());
    let sampler = Sampler::from_rate(|| now.get(), 10.0);
    assert_eq!(100, sampler.interval_ms());
    let mut never = Sampler::from_rate(|| now.get(), 0.0);
    now.set(u32::MAX - 1);
    assert!(!never.ready());
}

#[test]
fn sampler_wait() {
    let now = Cell::new(0u32);
    let mut sampler = Sampler::new(|| now.get(), 10);
    assert!(matches!(sampler.wait(), Err(nb::Error::WouldBlock)));
    now.set(10);
    assert!(sampler.wait().is_ok());
}

#[test]
fn change_detector_reports_each_change_once() {
    let a = [0b0000_0001u8, 0];
    let b = [0b0000_0011u8, 0];
    let c = [0b0000_0011u8, 0x80];
    let mut detector = ChangeDetector::new();
    let reported: Vec<_> = [a, a, b, b, c]
        .iter()
        .filter_map(|buffer| detector.observe(buffer))
        .collect();
    assert_eq!(vec![a, b, c], reported);
    assert_eq!(Some(c), detector.previous());

    detector.reset();
    assert_eq!(Some(c), detector.observe(&c));
}

#[test]
fn change_detector_polls_a_port() {
    let spi_expectations = [
        SpiTransaction::transfer(vec![0], vec![0x00]),
        SpiTransaction::transfer(vec![0], vec![0x00]),
        SpiTransaction::transfer(vec![0], vec![0x04]),
    ];
    let latch_expectations: Vec<_> = (0..3)
        .flat_map(|_| [PinTransaction::set(State::Low), PinTransaction::set(State::High)])
        .collect();
    let mut spi = SpiMock::new(&spi_expectations);
    let mut latch = PinMock::new(&latch_expectations);

    let mut inputs: InputShiftRegister<_, _, 1> =
        InputShiftRegister::hc165(spi.clone(), latch.clone());
    let mut detector = ChangeDetector::default();
    assert_eq!(Some([0x00]), detector.poll(&mut inputs).unwrap());
    assert_eq!(None, detector.poll(&mut inputs).unwrap());
    assert_eq!(Some([0x04]), detector.poll(&mut inputs).unwrap());

    spi.done();
    latch.done();
}

#[test]
fn monitor_latches_until_acknowledged() {
    let mut line = PinMock::new(&[
        PinTransaction::get(State::High),
        PinTransaction::get(State::Low),
        PinTransaction::get(State::High),
    ]);
    let mut monitor = InterruptMonitor::new(line.clone());
    assert_eq!(IrqState::Idle, monitor.state());
    assert_eq!(IrqState::Idle, monitor.poll().unwrap());
    assert_eq!(IrqState::Flagged, monitor.poll().unwrap());
    // flagged, the line is left alone
    assert_eq!(IrqState::Flagged, monitor.poll().unwrap());
    assert_eq!(IrqState::Flagged, monitor.poll().unwrap());

    monitor.acknowledge();
    assert_eq!(IrqState::Idle, monitor.poll().unwrap());

    line.done();
}
