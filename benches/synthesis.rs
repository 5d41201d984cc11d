use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma, Rgb, RgbImage};
use matting_synth::{
    coarse_trimap,
    config::{SynthesisConfig, SynthesisMode},
    ground_truth_trimap, DatasetManifest, Synthesizer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tempfile::TempDir;

fn write_assets(root: &Path) {
    for sub in ["fg", "mask", "bg"] {
        std::fs::create_dir_all(root.join(sub)).unwrap();
    }
    let fg = RgbImage::from_fn(400, 300, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 90]));
    fg.save(root.join("fg/subject.png")).unwrap();
    let alpha = GrayImage::from_fn(400, 300, |x, y| {
        if (120..280).contains(&x) && (90..210).contains(&y) {
            Luma([255])
        } else if (80..320).contains(&x) && (60..240).contains(&y) {
            Luma([128])
        } else {
            Luma([0])
        }
    });
    alpha.save(root.join("mask/subject.png")).unwrap();
    let bg = RgbImage::from_fn(800, 600, |x, y| Rgb([40, ((x + y) % 256) as u8, 160]));
    bg.save(root.join("bg/plate.png")).unwrap();
}

fn synthesizer_for(root: &Path, mode: SynthesisMode) -> Synthesizer {
    let config = SynthesisConfig::builder()
        .dataset_root(root)
        .mode(mode)
        .build()
        .unwrap();
    let manifest = DatasetManifest::from_lists(
        vec!["0_0.png".to_string()],
        vec!["subject.png".to_string()],
        vec!["plate.png".to_string()],
    );
    Synthesizer::with_manifest(config, manifest).unwrap()
}

fn bench_train_synthesis(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    write_assets(dir.path());
    let synth = synthesizer_for(dir.path(), SynthesisMode::Train);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("synthesize_train_320", |b| {
        b.iter(|| {
            let sample = synth.synthesize(black_box(0), &mut rng).unwrap();
            black_box(sample.input.len())
        });
    });
}

fn bench_valid_synthesis(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    write_assets(dir.path());
    let synth = synthesizer_for(dir.path(), SynthesisMode::Valid);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("synthesize_valid_320", |b| {
        b.iter(|| {
            let sample = synth.synthesize(black_box(0), &mut rng).unwrap();
            black_box(sample.input.len())
        });
    });
}

fn bench_trimap_coarsening(c: &mut Criterion) {
    let alpha = GrayImage::from_fn(320, 240, |x, y| {
        if (100..220).contains(&x) && (80..160).contains(&y) {
            Luma([255])
        } else if (60..260).contains(&x) && (40..200).contains(&y) {
            Luma([128])
        } else {
            Luma([0])
        }
    });
    let gt = ground_truth_trimap(&alpha);

    c.bench_function("coarse_trimap_k15", |b| {
        b.iter(|| black_box(coarse_trimap(black_box(&gt), 15)));
    });
}

criterion_group!(
    benches,
    bench_train_synthesis,
    bench_valid_synthesis,
    bench_trimap_coarsening
);
criterion_main!(benches);
