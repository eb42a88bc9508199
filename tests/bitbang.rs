use bitport::{
    bitbang::{SerialIn, SerialOut},
    shift::{InputShiftRegister, OutputShiftRegister},
};
use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction as PinTransaction};

fn clock_pulses(count: usize) -> Vec<PinTransaction> {
    (0..count)
        .flat_map(|_| [PinTransaction::set(State::High), PinTransaction::set(State::Low)])
        .collect()
}

fn levels(byte: u8) -> Vec<State> {
    (0..8)
        .rev()
        .map(|bit| if byte & (1 << bit) != 0 { State::High } else { State::Low })
        .collect()
}

#[test]
fn serial_out_through_hc595() {
    let _ = pretty_env_logger::try_init();
    let data_expectations: Vec<_> = levels(0b1010_0001)
        .into_iter()
        .map(PinTransaction::set)
        .collect();
    let mut data = PinMock::new(&data_expectations);
    let mut clock = PinMock::new(&clock_pulses(8));
    let mut latch = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);

    let serial = SerialOut::new(data.clone(), clock.clone());
    let mut outputs: OutputShiftRegister<_, _, 1> =
        OutputShiftRegister::hc595(serial, latch.clone());
    outputs.write_buffer(&[0b1010_0001]).unwrap();

    data.done();
    clock.done();
    latch.done();
}

#[test]
fn serial_in_through_hc165() {
    let first: Vec<_> = levels(0x5a).into_iter().map(PinTransaction::get).collect();
    let second: Vec<_> = levels(0x81).into_iter().map(PinTransaction::get).collect();
    let mut data = PinMock::new(&[first, second].concat());
    let mut clock = PinMock::new(&clock_pulses(16));
    let mut latch = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);

    let serial = SerialIn::new(data.clone(), clock.clone());
    let mut inputs: InputShiftRegister<_, _, 2> = InputShiftRegister::hc165(serial, latch.clone());
    let buffer = inputs.read_buffer().unwrap();
    assert_eq!([0x5a, 0x81], buffer);

    data.done();
    clock.done();
    latch.done();
}
