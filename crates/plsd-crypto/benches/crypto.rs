use plsd_crypto::{block_key, gen_exp, new_shard, pairing_pad, token_gen, trunc_xor, User};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

#[divan::bench]
fn bench_gen_exp() -> plsd_crypto::Exp {
    gen_exp()
}

#[divan::bench(args = [64, 128, 1024])]
fn bench_pairing_pad(bencher: divan::Bencher, pad_size: usize) {
    let s = gen_exp();
    let shard = new_shard(&s);
    let user = User::generate();
    let token = token_gen(user.public_key(), &s);
    let key = block_key(&token, &gen_exp());

    bencher.bench(|| pairing_pad(divan::black_box(&shard), divan::black_box(&key), pad_size));
}

#[divan::bench]
fn bench_encapsulate(bencher: divan::Bencher) {
    let s = gen_exp();
    let user = User::generate();
    let token = token_gen(user.public_key(), &s);
    let key = block_key(&token, &gen_exp());

    bencher.bench(|| user.encapsulate(divan::black_box(&key)));
}

#[divan::bench(args = [1024, 65536])]
fn bench_trunc_xor(bencher: divan::Bencher, size: usize) {
    let data = make_data(size);
    let pad = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| trunc_xor(divan::black_box(&data), divan::black_box(&pad)));
}

fn main() {
    divan::main();
}
