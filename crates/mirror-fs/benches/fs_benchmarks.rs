use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mirror_fs::{ContentComparator, DigestComparator, digest, io};
use std::fs;
use tempfile::tempdir;

fn digest_file_benchmark(c: &mut Criterion) {
    c.bench_function("digest::digest_file (1 MiB)", |b| {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, vec![7u8; 1024 * 1024]).unwrap();

        b.iter(|| {
            digest::digest_file(black_box(&path)).unwrap();
        })
    });
}

fn compare_benchmark(c: &mut Criterion) {
    c.bench_function("DigestComparator::content_equals (64 KiB)", |b| {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.bin");
        let replica = dir.path().join("replica.bin");
        fs::write(&source, vec![1u8; 64 * 1024]).unwrap();
        fs::write(&replica, vec![1u8; 64 * 1024]).unwrap();

        b.iter(|| {
            DigestComparator
                .content_equals(black_box(&source), black_box(&replica))
                .unwrap();
        })
    });
}

fn copy_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::copy_atomic", |b| {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("replica/target.txt");
        fs::write(&source, "hello world").unwrap();

        b.iter(|| {
            io::copy_atomic(black_box(&source), black_box(&target)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    digest_file_benchmark,
    compare_benchmark,
    copy_atomic_benchmark
);
criterion_main!(benches);
