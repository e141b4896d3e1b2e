//! Overlay a line, a scatter and a bar layer with the bars underneath, add
//! decorations, then show the result and save it as SVG.
//!
//! Run with `RUST_LOG=info cargo run -p layerplot --example layered_plot [out.svg|out.png]`.

use layerplot::{compose, ComposeOptions, Compositor, Layer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let layers = vec![
        Layer::line(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0])
            .with_option("color", "blue")
            .with_option("label", "Line Plot"),
        Layer::scatter(vec![1.0, 2.0, 3.0], vec![6.0, 5.0, 4.0])
            .with_option("color", "red")
            .with_option("label", "Scatter Plot"),
        Layer::bar(vec![1.0, 2.0, 3.0], vec![5.0, 6.0, 7.0])
            .with_option("color", "green")
            .with_option("label", "Bar Plot"),
    ];

    let options = ComposeOptions::new().with_order(vec![2, 0, 1]).with_show(false);
    let mut surface = compose(&layers, None, &options)?;

    let (_, axes) = &mut surface;
    axes.set_title("Layered Plot Example");
    axes.set_xlabel("X-Axis");
    axes.set_ylabel("Y-Axis");
    axes.legend();

    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| std::env::temp_dir().join("layered_plot.svg").display().to_string());

    // Nothing left to draw: present and save the decorated surface.
    let finish = ComposeOptions::new().save_to(&out);
    Compositor::new().compose_onto(&mut surface, &[], &finish)?;
    println!("wrote {}", out);
    Ok(())
}
