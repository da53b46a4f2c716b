#![no_main]
use bnk::Bank;
use libfuzzer_sys::fuzz_target;

// Arbitrary input either fails to parse or survives a re-encode unchanged
fuzz_target!(|data: &[u8]| {
    let bank = match Bank::from_bytes(data) {
        Ok(bank) => bank,
        Err(_) => return,
    };

    let encoded = bank.serialize().expect("parsed ids are always u32");
    let reparsed = Bank::from_bytes(&encoded).expect("encoded bank must parse");
    assert_eq!(reparsed, bank);
    assert_eq!(reparsed.serialize().unwrap(), encoded);
});
