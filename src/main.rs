//! xform - print the transforms described by the configuration
//!
//! Loads `config/`, builds the camera rig and prints its matrices, the
//! projected corners of a unit cube and the orientation interpolation.

use std::error::Error;

use xform::camera::CameraRig;
use xform::config::AppConfig;
use xform_math::{Mat4, Vec3};

fn print_matrix(name: &str, m: &Mat4) {
    println!("{}:", name);
    for row in m.as_array().chunks(4) {
        println!("  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]", row[0], row[1], row[2], row[3]);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let loaded = AppConfig::load();

    let log_level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting xform");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let rig = CameraRig::from_config(&config)?;
    let mvp = rig.model_view_projection();
    mvp.check_finite()?;

    print_matrix("model", &rig.model);
    print_matrix("view", &rig.view);
    print_matrix("projection", &rig.projection);
    print_matrix("model-view-projection", &mvp);

    println!("eye (from inverse view): {:?}", rig.eye_position()?);

    println!("unit cube corners in NDC:");
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { -0.5 } else { 0.5 },
            if i & 2 == 0 { -0.5 } else { 0.5 },
            if i & 4 == 0 { -0.5 } else { 0.5 },
        );
        match rig.project(corner) {
            Some(ndc) => println!("  {:?} -> {:?}", corner.to_array(), ndc.to_array()),
            None => log::warn!("Corner {:?} is on the camera plane", corner.to_array()),
        }
    }

    println!("orientation path:");
    for (step, q) in rig.orientation_path(config.animation.steps).iter().enumerate() {
        match q.axis_angle() {
            Ok((axis, angle)) => println!(
                "  {:>2}: {:>8.3} deg about {:?}",
                step,
                angle.to_degrees(),
                axis.to_array()
            ),
            Err(_) => println!("  {:>2}: identity", step),
        }
    }

    Ok(())
}
