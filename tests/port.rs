use bitport::{BitPort, InputBus, OutOfRange, OutputBus, PortError};
use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin, ToggleableOutputPin};

/// A chip whose pins read back whatever was last written to them
#[derive(Default)]
struct Loopback {
    pins: Vec<u8>,
    reads: usize,
    writes: usize,
    fail: bool,
}

impl Loopback {
    fn new(pins: &[u8]) -> Self {
        Self {
            pins: pins.to_vec(),
            ..Default::default()
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Nack;

impl InputBus for Loopback {
    type Error = Nack;
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Nack> {
        self.reads += 1;
        if self.fail {
            return Err(Nack);
        }
        buffer.copy_from_slice(&self.pins);
        Ok(())
    }
}

impl OutputBus for Loopback {
    type Error = Nack;
    fn write(&mut self, buffer: &[u8]) -> Result<(), Nack> {
        self.writes += 1;
        if self.fail {
            return Err(Nack);
        }
        self.pins.copy_from_slice(buffer);
        Ok(())
    }
    fn refresh(&mut self, buffer: &mut [u8]) -> Result<(), Nack> {
        self.read(buffer)
    }
}

#[test]
fn write_bit_then_read_bit() {
    let _ = pretty_env_logger::try_init();
    let start = [0b1010_0101u8, 0b0011_1100, 0b1111_0000];
    for position in 0..24 {
        let mut port: BitPort<_, 3> = BitPort::new(Loopback::new(&start));
        port.write_bit(position, true).unwrap();
        assert!(port.read_bit(position).unwrap());

        let after = port.read_buffer().unwrap();
        for other in (0..24).filter(|p| *p != position) {
            let before = start[other / 8] & (1 << (other % 8)) != 0;
            let now = after[other / 8] & (1 << (other % 8)) != 0;
            assert_eq!(before, now, "pin {} changed writing pin {}", other, position);
        }
    }
}

#[test]
fn per_pin_access_costs_a_transaction_each() {
    let mut port: BitPort<_, 2> = BitPort::new(Loopback::new(&[0, 0]));
    for position in [0, 2, 4, 6] {
        port.write_bit(position, true).unwrap();
    }
    assert_eq!(4, port.bus().writes);
    assert_eq!(4, port.bus().reads);

    port.write_buffer(&[0b0101_0101, 0]).unwrap();
    assert_eq!(5, port.bus().writes);
    assert_eq!(4, port.bus().reads);
}

#[test]
fn buffer_round_trip() {
    let mut port: BitPort<_, 2> = BitPort::new(Loopback::new(&[0, 0]));
    port.write_buffer(&[0xa5, 0x3c]).unwrap();
    assert_eq!([0xa5, 0x3c], port.read_buffer().unwrap());
    assert_eq!([0xa5, 0x3c], port.buffer());
}

#[test]
fn two_chip_layout() {
    let mut port: BitPort<_, 2> = BitPort::new(Loopback::new(&[0, 0]));
    port.write_buffer(&[0b0000_0001, 0b0000_0000]).unwrap();
    assert!(port.read_bit(0).unwrap());
    for position in 1..16 {
        assert!(!port.read_bit(position).unwrap(), "pin {}", position);
    }
}

#[test]
fn out_of_range_never_reaches_the_bus() {
    let mut port: BitPort<_, 1> = BitPort::new(Loopback::new(&[0]));
    assert_eq!(
        Err(PortError::OutOfRange(OutOfRange { position: 8, width: 8 })),
        port.read_bit(8)
    );
    // -1 as a pin index
    assert_eq!(
        Err(PortError::OutOfRange(OutOfRange {
            position: usize::MAX,
            width: 8
        })),
        port.write_bit(usize::MAX, true)
    );
    assert!(port.pin(8).is_err());
    assert_eq!(0, port.bus().reads);
    assert_eq!(0, port.bus().writes);
}

#[test]
fn length_mismatch() {
    let mut port: BitPort<_, 2> = BitPort::new(Loopback::new(&[0, 0]));
    assert_eq!(
        Err(PortError::LengthMismatch {
            expected: 2,
            actual: 3
        }),
        port.write_buffer(&[1, 2, 3])
    );
    assert_eq!(
        Err(PortError::LengthMismatch {
            expected: 2,
            actual: 1
        }),
        port.write_buffer(&[1])
    );
    assert_eq!(0, port.bus().writes);
}

#[test]
fn bus_failure_keeps_last_buffer() {
    let mut port: BitPort<_, 1> = BitPort::new(Loopback::new(&[0x0f]));
    assert_eq!([0x0f], port.read_buffer().unwrap());
    port.bus_mut().fail = true;
    assert_eq!(Err(PortError::Bus(Nack)), port.read_buffer());
    assert_eq!(Err(PortError::Bus(Nack)), port.write_buffer(&[0xff]));
    assert_eq!(Err(PortError::Bus(Nack)), port.write_bit(7, true));
    assert_eq!([0x0f], port.buffer());
}

#[test]
fn pin_views() {
    let mut port: BitPort<_, 1> = BitPort::new(Loopback::new(&[0]));
    {
        let mut led = port.pin(3).unwrap();
        assert_eq!(3, led.position());
        led.set_high().unwrap();
        assert!(led.is_set_high().unwrap());
        assert!(led.value().unwrap());
        led.toggle().unwrap();
        assert!(led.is_set_low().unwrap());
        led.set_value(true).unwrap();
    }
    port.pin(5).unwrap().set_high().unwrap();
    assert_eq!([0b0010_1000], port.read_buffer().unwrap());
}

#[test]
fn width() {
    let port: BitPort<_, 3> = BitPort::new(Loopback::new(&[0, 0, 0]));
    assert_eq!(24, port.width());
    assert_eq!(24, BitPort::<Loopback, 3>::WIDTH);
}
