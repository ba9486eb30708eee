//! MurmurHash family (seed-parameterized, little-endian block reads).
//!
//! Implemented locally so that every variant the encoding catalog needs
//! comes from one place with identical byte handling.

const M1: u32 = 0xc6a4a793;
const M2: u32 = 0x5bd1e995;
const M64: u64 = 0xc6a4a7935bd1e995;

const C1_32: u32 = 0xcc9e2d51;
const C2_32: u32 = 0x1b873593;
const C1_128: u64 = 0x87c37b91114253d5;
const C2_128: u64 = 0x4cf5ad432745937f;

fn read_u32(chunk: &[u8]) -> u32 {
    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
}

fn read_u64(chunk: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&chunk[..8]);
    u64::from_le_bytes(buf)
}

/// MurmurHash1, 32-bit.
pub fn murmur1_32(data: &[u8], seed: u32) -> u32 {
    let len = data.len() as u32;
    let mut h = seed ^ len.wrapping_mul(M1);

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        h = h.wrapping_add(read_u32(chunk));
        h = h.wrapping_mul(M1);
        h ^= h >> 16;
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        if tail.len() >= 3 {
            h = h.wrapping_add((tail[2] as u32) << 16);
        }
        if tail.len() >= 2 {
            h = h.wrapping_add((tail[1] as u32) << 8);
        }
        h = h.wrapping_add(tail[0] as u32);
        h = h.wrapping_mul(M1);
        h ^= h >> 16;
    }

    h = h.wrapping_mul(M1);
    h ^= h >> 10;
    h = h.wrapping_mul(M1);
    h ^= h >> 17;
    h
}

/// MurmurHash2, 32-bit.
pub fn murmur2_32(data: &[u8], seed: u32) -> u32 {
    let mut h = seed ^ data.len() as u32;

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = read_u32(chunk);
        k = k.wrapping_mul(M2);
        k ^= k >> 24;
        k = k.wrapping_mul(M2);
        h = h.wrapping_mul(M2);
        h ^= k;
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        if tail.len() >= 3 {
            h ^= (tail[2] as u32) << 16;
        }
        if tail.len() >= 2 {
            h ^= (tail[1] as u32) << 8;
        }
        h ^= tail[0] as u32;
        h = h.wrapping_mul(M2);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M2);
    h ^= h >> 15;
    h
}

/// MurmurHash64A, the 64-bit variant of MurmurHash2.
pub fn murmur2_64(data: &[u8], seed: u64) -> u64 {
    const R: u32 = 47;
    let mut h = seed ^ (data.len() as u64).wrapping_mul(M64);

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let mut k = read_u64(chunk);
        k = k.wrapping_mul(M64);
        k ^= k >> R;
        k = k.wrapping_mul(M64);
        h ^= k;
        h = h.wrapping_mul(M64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, &b) in tail.iter().enumerate().rev() {
            h ^= (b as u64) << (8 * i);
        }
        h = h.wrapping_mul(M64);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M64);
    h ^= h >> R;
    h
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^= k >> 33;
    k
}

/// MurmurHash3 x86 32-bit.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k1 = read_u32(chunk);
        k1 = k1.wrapping_mul(C1_32);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2_32);

        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (i, &b) in tail.iter().enumerate() {
            k1 ^= (b as u32) << (8 * i);
        }
        k1 = k1.wrapping_mul(C1_32);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2_32);
        h1 ^= k1;
    }

    h1 ^= data.len() as u32;
    fmix32(h1)
}

/// MurmurHash3 x64 128-bit, returned as its two 64-bit halves.
pub fn murmur3_128(data: &[u8], seed: u64) -> (u64, u64) {
    let mut h1 = seed;
    let mut h2 = seed;

    let mut chunks = data.chunks_exact(16);
    for chunk in &mut chunks {
        let mut k1 = read_u64(&chunk[..8]);
        let mut k2 = read_u64(&chunk[8..]);

        k1 = k1.wrapping_mul(C1_128);
        k1 = k1.rotate_left(31);
        k1 = k1.wrapping_mul(C2_128);
        h1 ^= k1;

        h1 = h1.rotate_left(27);
        h1 = h1.wrapping_add(h2);
        h1 = h1.wrapping_mul(5).wrapping_add(0x52dce729);

        k2 = k2.wrapping_mul(C2_128);
        k2 = k2.rotate_left(33);
        k2 = k2.wrapping_mul(C1_128);
        h2 ^= k2;

        h2 = h2.rotate_left(31);
        h2 = h2.wrapping_add(h1);
        h2 = h2.wrapping_mul(5).wrapping_add(0x38495ab5);
    }

    let tail = chunks.remainder();
    if tail.len() > 8 {
        let mut k2 = 0u64;
        for (i, &b) in tail[8..].iter().enumerate() {
            k2 ^= (b as u64) << (8 * i);
        }
        k2 = k2.wrapping_mul(C2_128);
        k2 = k2.rotate_left(33);
        k2 = k2.wrapping_mul(C1_128);
        h2 ^= k2;
    }
    if !tail.is_empty() {
        let mut k1 = 0u64;
        for (i, &b) in tail[..tail.len().min(8)].iter().enumerate() {
            k1 ^= (b as u64) << (8 * i);
        }
        k1 = k1.wrapping_mul(C1_128);
        k1 = k1.rotate_left(31);
        k1 = k1.wrapping_mul(C2_128);
        h1 ^= k1;
    }

    let len = data.len() as u64;
    h1 ^= len;
    h2 ^= len;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    (h1, h2)
}
