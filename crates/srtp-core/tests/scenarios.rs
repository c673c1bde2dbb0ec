use srtp_core::prelude::*;

fn scenario_d_context() -> SrtpContext {
    let key: Vec<u8> = (0x00u8..0x10).collect();
    let salt: Vec<u8> = (0x00u8..0x0E).collect();
    SrtpContext::new(SrtpSuite::AesCm128HmacSha1_80, key, salt).unwrap()
}

fn rtp_packet(seq: u16, payload_len: usize) -> Vec<u8> {
    let mut packet = vec![0x80, 0x00, 0, 0, 0, 0, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF];
    packet[2..4].copy_from_slice(&seq.to_be_bytes());
    packet.extend(vec![0x00u8; payload_len]);
    packet
}

#[test]
fn scenario_d_srtp_encrypt_decrypt_round_trip() {
    let mut tx = scenario_d_context();
    let mut rx = scenario_d_context();

    let plaintext = rtp_packet(0, 160);
    assert_eq!(plaintext.len(), 172);

    let encrypted = encrypt_rtp(&mut tx, &plaintext).unwrap();
    assert_eq!(encrypted.len(), 12 + 160 + 10);

    let decrypted = decrypt_rtp(&mut rx, &encrypted).unwrap();
    assert_eq!(decrypted, plaintext);
    assert_eq!(tx.roc, 0);
    assert_eq!(rx.roc, 0);
    assert_eq!(rx.s_l, 0);
}

#[test]
fn scenario_e_roc_advances_on_wrap() {
    let mut tx = scenario_d_context();
    let mut rx = scenario_d_context();

    for seq in 0u32..65536 {
        let plaintext = rtp_packet(seq as u16, 16);
        let encrypted = encrypt_rtp(&mut tx, &plaintext).unwrap();
        let decrypted = decrypt_rtp(&mut rx, &encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
    }
    assert_eq!(tx.roc, 1);
    assert_eq!(rx.roc, 0);
    assert_eq!(rx.s_l, 65535);

    let wrapped = rtp_packet(0, 16);
    let encrypted = encrypt_rtp(&mut tx, &wrapped).unwrap();
    let decrypted = decrypt_rtp(&mut rx, &encrypted).unwrap();
    assert_eq!(decrypted, wrapped);
    assert_eq!(rx.roc, 1);
}

#[test]
fn scenario_f_sdes_crypto_attribute_round_trip() {
    let input = "1 AES_CM_128_HMAC_SHA1_80 inline:PS1uQCVeeCFCanVmcjkpPywjNWhcYD0mXXtxaVBR|2^20|1:4 KDR=0";
    let attr = CryptoAttribute::parse(input).unwrap();

    assert_eq!(attr.tag, 1);
    assert_eq!(attr.suite, SrtpSuite::AesCm128HmacSha1_80);
    assert_eq!(attr.keys[0].lifetime, Some(1 << 20));
    assert_eq!(attr.keys[0].mki, Some((1, 4)));
    assert_eq!(attr.params, vec![SessionParam::Kdr(0)]);

    assert_eq!(attr.to_string(), input);
}

#[test]
fn srtcp_encrypt_decrypt_round_trip_through_public_api() {
    let mut tx = scenario_d_context();
    let mut rx = scenario_d_context();

    let mut packet = vec![0x80, 0xC8, 0x00, 0x06, 0xDE, 0xAD, 0xBE, 0xEF];
    packet.extend(vec![0x11u8; 20]);

    let encrypted = encrypt_rtcp(&mut tx, &packet).unwrap();
    let decrypted = decrypt_rtcp(&mut rx, &encrypted).unwrap();
    assert_eq!(decrypted, packet);
}
