use core::cell::Cell;

use arduino_hal::pac::TC0;
use avr_device::interrupt::Mutex;

const PRESCALER: u32 = 1024;
/// Compare match value, 125 ticks of 64us
const TIMER_COUNTS: u32 = 125;
const MILLIS_INCREMENT: u32 = PRESCALER * TIMER_COUNTS / 16_000;

static MILLIS_COUNTER: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Runs timer 0 in CTC mode so TIMER0_COMPA fires every [MILLIS_INCREMENT] ms.
/// Interrupts still have to be enabled with `avr_device::interrupt::enable`.
pub fn init(timer: TC0) {
    timer.tccr0a.write(|w| w.wgm0().ctc());
    timer.ocr0a.write(|w| w.bits(TIMER_COUNTS as u8));
    timer.tccr0b.write(|w| w.cs0().prescale_1024());
    timer.timsk0.write(|w| w.ocie0a().set_bit());

    avr_device::interrupt::free(|cs| MILLIS_COUNTER.borrow(cs).set(0));
}

#[avr_device::interrupt(atmega328p)]
fn TIMER0_COMPA() {
    avr_device::interrupt::free(|cs| {
        let counter = MILLIS_COUNTER.borrow(cs);
        counter.set(counter.get().wrapping_add(MILLIS_INCREMENT));
    })
}

/// Milliseconds since [init], wrapping at `u32::MAX`
pub fn now() -> u32 {
    avr_device::interrupt::free(|cs| MILLIS_COUNTER.borrow(cs).get())
}
