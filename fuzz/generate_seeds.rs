#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn screen(version: &[u8; 3], w: u16, h: u16, gct: &[[u8; 3]]) -> Vec<u8> {
    let mut out = b"GIF".to_vec();
    out.extend_from_slice(version);
    out.extend_from_slice(&w.to_le_bytes());
    out.extend_from_slice(&h.to_le_bytes());
    if gct.is_empty() {
        out.extend_from_slice(&[0, 0, 0]);
    } else {
        let size = gct.len().trailing_zeros() as u8 - 1;
        out.extend_from_slice(&[0x80 | size, 0, 0]);
        out.extend(gct.iter().flatten());
    }
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    let bw = [[0, 0, 0], [255, 255, 255]];
    // 2x1 frame: clear, 0, 1, end-of-information at code size 2
    let image = [0x2C, 0, 0, 0, 0, 2, 0, 1, 0, 0, 2, 2, 0x44, 0x0A, 0];

    // Single frame, global table
    let mut single = screen(b"89a", 2, 1, &bw);
    single.extend_from_slice(&image);
    single.push(0x3B);
    fs::write(format!("{dir}/single_2x1.gif"), &single).unwrap();

    // 87a, local table, no graphic control
    let mut local = screen(b"87a", 2, 1, &[]);
    local.extend_from_slice(&image[..9]);
    local.push(0x80);
    local.extend_from_slice(&[255, 0, 0, 0, 0, 255]);
    local.extend_from_slice(&image[10..]);
    local.push(0x3B);
    fs::write(format!("{dir}/local_table_87a.gif"), &local).unwrap();

    // Animation: loop block, comment, two frames with graphic control
    let mut anim = screen(b"89a", 2, 1, &bw);
    anim.extend_from_slice(b"\x21\xFF\x0BNETSCAPE2.0\x03\x01\x00\x00\x00");
    anim.extend_from_slice(b"\x21\xFE\x05hello\x00");
    anim.extend_from_slice(&[0x21, 0xF9, 4, 0x04, 10, 0, 0, 0]);
    anim.extend_from_slice(&image);
    anim.extend_from_slice(&[0x21, 0xF9, 4, 0x09, 0, 0, 1, 0]);
    anim.extend_from_slice(&image);
    anim.push(0x3B);
    fs::write(format!("{dir}/animation.gif"), &anim).unwrap();

    // Unknown extension label between blocks
    let mut unknown = screen(b"89a", 2, 1, &bw);
    unknown.extend_from_slice(&[0x21, 0x42, 2, 1, 2, 0]);
    unknown.extend_from_slice(&image);
    unknown.push(0x3B);
    fs::write(format!("{dir}/unknown_extension.gif"), &unknown).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_signature.bin"), b"GIF89a").unwrap();
    fs::write(format!("{dir}/no_trailer.gif"), &single[..single.len() - 1]).unwrap();
    fs::write(format!("{dir}/cut_image.gif"), &single[..single.len() - 4]).unwrap();

    println!("Generated seed corpus in {dir}/");
}
