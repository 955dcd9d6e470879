use super::*;
use crate::hal::gpio::PinLevel;
use crate::sim::{AccessKind, GpioSim, MemoryBus};

const BASE: usize = 0x4000_0000;

fn reg(r: GpioRegister) -> usize {
    BASE + r.offset()
}

#[test]
fn offsets_match_the_register_table() {
    let expected = [0x00, 0x04, 0x08, 0x0C, 0x10, 0x14, 0x18, 0x1C, 0x20, 0x24];
    for (r, offset) in GpioRegister::ALL.iter().zip(expected) {
        assert_eq!(r.offset(), offset, "{:?}", r);
    }
}

#[test]
fn offsets_are_unique_and_word_aligned() {
    for (i, a) in GpioRegister::ALL.iter().enumerate() {
        assert_eq!(a.offset() % 4, 0);
        for b in &GpioRegister::ALL[i + 1..] {
            assert_ne!(a.offset(), b.offset());
        }
    }
}

#[test]
fn from_offset_inverts_offset() {
    for r in GpioRegister::ALL {
        assert_eq!(GpioRegister::from_offset(r.offset()), Some(r));
    }
    assert_eq!(GpioRegister::from_offset(0x28), None);
    assert_eq!(GpioRegister::from_offset(0x02), None);
}

#[test]
fn each_setter_is_one_write_to_its_register() {
    let bus = MemoryBus::new();
    let mut gpio = Gpio::new(&bus, BASE);

    let cases: [(fn(&mut Gpio<&MemoryBus>, u32), GpioRegister); 8] = [
        (|g, v| g.set_direction(v), GpioRegister::Direction),
        (|g, v| g.load_pins(v), GpioRegister::OutputLoad),
        (|g, v| g.set_pins(v), GpioRegister::OutputSet),
        (|g, v| g.clear_pins(v), GpioRegister::OutputClear),
        (|g, v| g.toggle_pins(v), GpioRegister::OutputToggle),
        (|g, v| g.irq_set_mask(v), GpioRegister::IrqMask),
        (|g, v| g.irq_set_rise_mask(v), GpioRegister::RiseMask),
        (|g, v| g.irq_set_fall_mask(v), GpioRegister::FallMask),
    ];

    for (op, target) in cases {
        bus.clear_log();
        op(&mut gpio, 0xA5A5_5A5A);

        let writes = bus.writes();
        assert_eq!(writes.len(), 1, "{:?}", target);
        assert_eq!(writes[0].addr, reg(target));
        assert_eq!(writes[0].value, 0xA5A5_5A5A);
        assert!(bus.reads().is_empty(), "{:?} must not read", target);
    }
}

#[test]
fn each_getter_is_one_read_of_its_register() {
    let bus = MemoryBus::new();
    for (i, r) in GpioRegister::ALL.iter().enumerate() {
        bus.poke(reg(*r), 0x100 + i as u32);
    }
    let gpio = Gpio::new(&bus, BASE);

    let cases: [(fn(&Gpio<&MemoryBus>) -> u32, GpioRegister); 7] = [
        (|g| g.read_dir(), GpioRegister::Direction),
        (|g| g.read_output(), GpioRegister::OutputLoad),
        (|g| g.read_pins(), GpioRegister::Pins),
        (|g| g.read_irq_mask(), GpioRegister::IrqMask),
        (|g| g.read_irq_rise_mask(), GpioRegister::RiseMask),
        (|g| g.read_irq_fall_mask(), GpioRegister::FallMask),
        (|g| g.read_irq_status(), GpioRegister::IrqStatus),
    ];

    for (op, source) in cases {
        bus.clear_log();
        let value = op(&gpio);

        assert_eq!(value, 0x100 + source as u32);
        let reads = bus.reads();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].addr, reg(source));
        assert_eq!(bus.write_count(), 0);
    }
}

#[test]
fn reads_are_never_cached() {
    let bus = MemoryBus::new();
    let gpio = Gpio::new(&bus, BASE);

    bus.poke(reg(GpioRegister::Pins), 1);
    assert_eq!(gpio.read_pins(), 1);
    bus.poke(reg(GpioRegister::Pins), 2);
    assert_eq!(gpio.read_pins(), 2);
    assert_eq!(bus.reads().len(), 2);
}

#[test]
fn direction_round_trips() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    for mask in [0, 1, 0x0000_FFFF, 0x8000_0001, u32::MAX] {
        gpio.set_direction(mask);
        assert_eq!(gpio.read_dir(), mask);
    }
}

#[test]
fn load_round_trips() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    for value in [0, 0xDEAD_BEEF, u32::MAX] {
        gpio.load_pins(value);
        assert_eq!(gpio.read_output(), value);
    }
}

#[test]
fn set_clear_toggle_act_on_the_latch() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    gpio.set_direction(0x0000_00FF);
    gpio.load_pins(0);
    gpio.set_pins(0x55);
    assert_eq!(gpio.read_output(), 0x55);

    gpio.clear_pins(1 << 2);
    assert_eq!(gpio.read_output(), 0x51);

    gpio.toggle_pins(0xF);
    assert_eq!(gpio.read_output(), 0x5E);

    // Set must not depend on a prior load.
    gpio.load_pins(0xF000_0000);
    gpio.set_pins(0x1);
    assert_eq!(gpio.read_output(), 0xF000_0001);

    // The set register itself holds nothing.
    let set_value = (&sim).read32(reg(GpioRegister::OutputSet));
    assert_eq!(set_value, 0);
}

#[test]
fn pins_reflect_outputs_and_driven_inputs() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    gpio.set_direction(0x0000_00FF);
    gpio.load_pins(0x0000_00AA);
    sim.drive_inputs(0x1234_5600);

    assert_eq!(gpio.read_pins(), 0x1234_56AA);
}

#[test]
fn init_writes_configuration_in_order() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, 0);
    let config = GpioConfig::new(0x0F, 0xF0, 0x30, 0xC0);

    gpio.init(BASE, Some(&config));

    assert_eq!(gpio.base(), BASE);
    assert_eq!(
        sim.written_registers(),
        [
            GpioRegister::Direction,
            GpioRegister::IrqMask,
            GpioRegister::RiseMask,
            GpioRegister::FallMask,
        ]
    );

    let writes = sim.writes();
    assert!(writes.windows(2).all(|w| w[0].seq < w[1].seq));
    assert_eq!(
        writes.iter().map(|w| w.value).collect::<Vec<_>>(),
        [0x0F, 0xF0, 0x30, 0xC0]
    );

    assert_eq!(gpio.read_dir(), 0x0F);
    assert_eq!(gpio.read_irq_mask(), 0xF0);
    assert_eq!(gpio.read_irq_rise_mask(), 0x30);
    assert_eq!(gpio.read_irq_fall_mask(), 0xC0);
}

#[test]
fn init_without_config_only_retargets() {
    let bus = MemoryBus::new();
    let mut gpio = Gpio::new(&bus, BASE);

    gpio.init(0x5000_0000, None);

    assert_eq!(gpio.base(), 0x5000_0000);
    assert!(bus.writes().is_empty());
    assert!(bus.reads().is_empty());

    gpio.set_direction(0x3);
    let writes = bus.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].addr, 0x5000_0000 + GpioRegister::Direction.offset());
}

#[test]
fn status_read_clears_the_latch() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    gpio.init(BASE, Some(&GpioConfig::new(0, 0b11, 0b01, 0b10)));
    sim.drive_inputs(0b11);
    sim.drive_inputs(0b00);
    assert!(sim.irq_line());

    sim.clear_log();
    assert_eq!(gpio.read_irq_status(), 0b11);
    assert!(!sim.irq_line());
    assert_eq!(gpio.read_irq_status(), 0);

    assert!(sim.writes().is_empty());
    let reads = sim.reads();
    assert_eq!(reads.len(), 2);
    assert!(reads.iter().all(|r| r.addr == reg(GpioRegister::IrqStatus)));
}

#[test]
fn status_register_ignores_writes() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    gpio.init(BASE, Some(&GpioConfig::new(0, 1, 1, 0)));
    sim.drive_inputs(1);
    (&sim).write32(reg(GpioRegister::IrqStatus), u32::MAX);

    assert_eq!(sim.status(), 1);
    assert_eq!(gpio.read_irq_status(), 1);
}

#[test]
fn edges_latch_only_when_enabled() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    // Pin 0 rising, pin 1 falling, pin 2 rising but masked, pin 3 an output.
    gpio.init(BASE, Some(&GpioConfig::new(0b1000, 0b1011, 0b1101, 0b0010)));

    sim.drive_inputs(0b1111);
    assert!(sim.irq_line());
    assert_eq!(gpio.read_irq_status(), 0b0001);

    sim.drive_inputs(0b0000);
    assert_eq!(gpio.read_irq_status(), 0b0010);

    // No transition, nothing latched.
    sim.drive_inputs(0b0000);
    assert_eq!(gpio.read_irq_status(), 0);
    assert!(!sim.irq_line());
}

#[test]
fn masks_are_passed_through_unchanged() {
    let bus = MemoryBus::new();
    let mut gpio = Gpio::new(&bus, BASE);

    gpio.irq_set_mask(u32::MAX);
    gpio.toggle_pins(0x8000_0000);

    let values: Vec<u32> = bus.writes().iter().map(|w| w.value).collect();
    assert_eq!(values, [u32::MAX, 0x8000_0000]);
}

#[test]
fn port_trait_helpers_touch_one_bit() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);
    gpio.set_direction(u32::MAX);
    gpio.load_pins(0);

    gpio.set_high(4).unwrap();
    gpio.set_level(7, PinLevel::High).unwrap();
    assert_eq!(gpio.output(), 0x90);

    gpio.set_low(4).unwrap();
    gpio.toggle_pin(0).unwrap();
    assert_eq!(gpio.output(), 0x81);

    assert_eq!(gpio.read_pin(7), Ok(PinLevel::High));
    assert_eq!(gpio.read_pin(6), Ok(PinLevel::Low));
    assert_eq!(gpio.set_high(32), Err(GpioError::InvalidPin));
}

#[test]
fn per_pin_helpers_use_dedicated_registers() {
    let bus = MemoryBus::new();
    let mut gpio = Gpio::new(&bus, BASE);

    gpio.set_high(1).unwrap();
    gpio.set_low(2).unwrap();
    gpio.toggle_pin(3).unwrap();

    let writes = bus.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!((writes[0].addr, writes[0].value), (reg(GpioRegister::OutputSet), 1 << 1));
    assert_eq!((writes[1].addr, writes[1].value), (reg(GpioRegister::OutputClear), 1 << 2));
    assert_eq!((writes[2].addr, writes[2].value), (reg(GpioRegister::OutputToggle), 1 << 3));
    assert!(bus.reads().is_empty());
}

#[test]
fn edge_detect_helpers() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);

    gpio.enable_edge_detect(5, EdgeDetect::Both).unwrap();
    gpio.enable_edge_detect(6, EdgeDetect::Rising).unwrap();
    assert_eq!(gpio.read_irq_mask(), 0x60);
    assert_eq!(gpio.read_irq_rise_mask(), 0x60);
    assert_eq!(gpio.read_irq_fall_mask(), 0x20);

    sim.drive_inputs(1 << 5 | 1 << 6);
    assert_eq!(gpio.take_events(), 0x60);
    assert_eq!(gpio.take_events(), 0);

    // Pin 5 detects falling edges too; pin 6 does not.
    sim.drive_inputs(0);
    assert_eq!(gpio.take_event(6), Ok(false));
    sim.drive_inputs(1 << 5);
    assert_eq!(gpio.take_event(5), Ok(true));
    assert_eq!(gpio.take_event(5), Ok(false));

    gpio.disable_edge_detect(5).unwrap();
    assert_eq!(gpio.read_irq_mask(), 0x40);
    assert_eq!(gpio.read_irq_rise_mask(), 0x40);
    assert_eq!(gpio.read_irq_fall_mask(), 0);

    assert_eq!(gpio.take_event(40), Err(GpioError::InvalidPin));
}

#[test]
fn release_returns_the_bus() {
    let sim = GpioSim::new(BASE);
    let mut gpio = Gpio::new(&sim, BASE);
    gpio.load_pins(7);

    let bus = gpio.release();
    assert_eq!(bus.latch(), 7);
    assert_eq!(sim.writes().len(), 1);
    assert_eq!(sim.writes()[0].kind, AccessKind::Write);
}

#[test]
fn register_addresses_wrap_at_the_top_of_the_address_space() {
    let bus = MemoryBus::new();
    let base = usize::MAX - 3;
    let mut gpio = Gpio::new(&bus, base);

    gpio.set_direction(1);
    gpio.irq_set_fall_mask(2);
    assert_eq!(gpio.read_irq_status(), 0);

    let addrs: Vec<usize> = bus.writes().iter().map(|w| w.addr).collect();
    assert_eq!(addrs, [usize::MAX - 3, 0x18]);
    assert_eq!(bus.reads()[0].addr, 0x1C);
}
