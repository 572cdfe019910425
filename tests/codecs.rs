use edgewise::{
    Bits, GaussianNoise, Parity, PwmConfig, PwmDecode, RxChar, RxStatus, SerialConfig, Signal,
    bin2pwm, code2mod, mod2code, pwm2bin, serial_rx, serial_tx,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_scenario_pwm_nibble() {
    let config = PwmConfig::new(1_i64, 2, 3);
    let line = bin2pwm(Bits::new(4, 0b1010), &config, 0).unwrap();
    let widths: Vec<i64> = line
        .segments()
        .filter(|&(_, _, level)| level)
        .map(|(from, to, _)| to - from)
        .collect();
    assert_eq!(widths, vec![1, 2, 1, 2]);
    let starts: Vec<i64> = line
        .segments()
        .filter(|&(_, _, level)| level)
        .map(|(from, _, _)| from)
        .collect();
    assert_eq!(starts, vec![0, 3, 6, 9]);

    for mode in [PwmDecode::Pulses, PwmDecode::Slots { threshold: 0.1 }] {
        let decoded = pwm2bin(&line, &config, mode).unwrap();
        assert_eq!(decoded.bits, Bits::new(4, 0b1010));
        assert_eq!(decoded.error, 0);
    }
}

#[test]
fn test_scenario_serial_letter() {
    let config = SerialConfig::new(1.0);
    let line = serial_tx(&[u16::from(b'A')], &[0_i64], &config).unwrap();
    let received = serial_rx(&line, &config).unwrap();
    assert_eq!(
        received,
        vec![RxChar {
            value: u16::from(b'A'),
            time: 0,
            status: RxStatus::empty(),
        }]
    );
}

#[test]
fn test_pwm_round_trip_random_words() {
    let mut rng = StdRng::seed_from_u64(21);
    let config = PwmConfig::new(2.0, 5.0, 8.0);
    for _ in 0..50 {
        let count = rng.gen_range(1..=64);
        let mask = u64::MAX >> (64 - count);
        let bits = Bits::new(count, rng.gen_range(0..=u64::MAX) & mask);
        let line = bin2pwm(bits, &config, rng.gen_range(-100.0..100.0)).unwrap();
        let decoded = pwm2bin(&line, &config, PwmDecode::Pulses).unwrap();
        assert_eq!(decoded.bits, bits);
    }
}

#[test]
fn test_pwm_slots_survive_jitter() {
    let config = PwmConfig::new(2.0, 6.0, 10.0);
    let bits = Bits::new(16, 0xa5c3);
    let mut noise = GaussianNoise::with_rng(0.2, StdRng::seed_from_u64(22));
    let line = bin2pwm(bits, &config, 0.0).unwrap().jittered(&mut noise);
    let mode = PwmDecode::Slots { threshold: 0.05 };
    let decoded = pwm2bin(&line, &config, mode).unwrap();
    assert_eq!(decoded.bits, bits);
    assert_eq!(decoded.error, 0);
}

#[test]
fn test_symbol_round_trip() {
    let symbols = vec![
        Signal::new(0.0, vec![1.0, 2.0], 4.0, false).unwrap(),
        Signal::new(0.0, vec![1.0, 3.0], 4.0, false).unwrap(),
        Signal::new(0.0, vec![2.0, 3.0], 4.0, false).unwrap(),
        Signal::new(0.0, vec![], 4.0, false).unwrap(),
    ];
    let mut rng = StdRng::seed_from_u64(23);
    let codes: Vec<usize> = (0..40).map(|_| rng.gen_range(0..symbols.len())).collect();
    let line = code2mod(&codes, &symbols, 2.5).unwrap();
    assert_eq!(line.elapse(), Some(160.0));
    assert_eq!(mod2code(&line, &symbols, None, None).unwrap(), codes);
}

#[test]
fn test_serial_text_round_trip() {
    let text = "The quick brown fox";
    let chars: Vec<u16> = text.bytes().map(u16::from).collect();
    let times: Vec<f64> = (0..chars.len()).map(|i| i as f64 * 1.5e-3).collect();
    let config = SerialConfig::new(19200.0).parity(Parity::Even);
    let line = serial_tx(&chars, &times, &config).unwrap();
    let received = serial_rx(&line, &config).unwrap();
    let values: Vec<u16> = received.iter().map(|c| c.value).collect();
    assert_eq!(values, chars);
    assert!(received.iter().all(|c| c.status.is_ok()));
    assert!(received.windows(2).all(|w| w[0].time < w[1].time));
}

#[test]
fn test_serial_parity_from_text() {
    let parity: Parity = "odd".parse().unwrap();
    let config = SerialConfig::new(1.0).char_bits(5).parity(parity);
    let line = serial_tx(&[0b10110, 0b00001], &[0_i64, 3], &config).unwrap();
    let received = serial_rx(&line, &config).unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].value, 0b10110);
    assert_eq!(received[1].value, 0b00001);
    assert_eq!(received[1].time, 8);
}
