//! K-means, variance, and a k sweep on a simple 2D dataset, then a small
//! Markov chain and HMM.

use ndarray::array;
use unsup::cluster::{optimum_k, total_variance, Kmeans};
use unsup::markov::{check_absorbing, steady_state, Hmm};

fn main() -> unsup::Result<()> {
    // Three well-separated clusters in 2D.
    let data: Vec<Vec<f32>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
    ];

    // --- K-means (k=3) ---
    let fit = Kmeans::new(3).with_seed(42).fit(&data)?;
    println!("=== K-means (k=3, {} iterations) ===", fit.n_iter);
    for (i, label) in fit.labels.iter().enumerate() {
        println!("  point {:2} ({:5.1}, {:5.1}) => cluster {}", i, data[i][0], data[i][1], label);
    }
    println!("  total variance: {:.4}", total_variance(&data, &fit.centroids)?);

    // --- k sweep ---
    println!("\n=== k sweep (1..=5) ===");
    for entry in optimum_k(&data, 1, 5, &Kmeans::new(1).with_seed(42))? {
        println!(
            "  k={} variance={:8.4} delta={:8.4}",
            entry.k, entry.variance, entry.variance_delta
        );
    }

    // --- Markov chains ---
    println!("\n=== Markov chains ===");
    let absorbing = array![[1.0, 0.0, 0.0], [0.2, 0.5, 0.3], [0.0, 0.4, 0.6]];
    println!("  absorbing: {}", check_absorbing(&absorbing.view())?);
    let weather = array![[0.6, 0.4], [0.3, 0.7]];
    if let Some(pi) = steady_state(&weather.view())? {
        println!("  weather steady state: {pi}");
    }

    // --- HMM ---
    let model = Hmm::new(
        array![[0.9, 0.1], [0.2, 0.8]],
        array![[0.7, 0.3], [0.3, 0.7]],
        array![0.5, 0.5],
    )?;
    let obs = [0, 0, 1, 1, 0];
    let (likelihood, _) = model.forward(&obs)?;
    let (path, _) = model.viterbi(&obs)?;
    println!("\n=== HMM ===");
    println!("  P(obs) = {likelihood:.6}, viterbi path = {path:?}");

    Ok(())
}
