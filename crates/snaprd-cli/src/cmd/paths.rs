//! Paths command

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use snaprd_snap::Revision;
use snaprd_snap::paths::{
    common_data_dir, common_data_home_dir, data_dir, data_home_dir, mount_dir, mount_file,
    user_common_data_dir, user_data_dir, user_xdg_runtime_dir, xdg_runtime_dirs,
};
use snaprd_snap::validate::validate_name;

/// Print every filesystem location derived from a snap name and revision.
pub fn paths(name: &str, revision: &str, home: Option<&Path>, uid: Option<u32>) -> Result<()> {
    validate_name(name)?;
    let revision: Revision = revision.parse()?;

    let lw = 24;

    println!();
    println!(
        "  {} {}",
        name.white().bold(),
        revision.to_string().dark_grey()
    );
    println!();

    println!("  {:<lw$}{}", "mount dir", mount_dir(name, revision).display());
    println!("  {:<lw$}{}", "blob", mount_file(name, revision).display());
    println!("  {:<lw$}{}", "data dir", data_dir(name, revision).display());
    println!(
        "  {:<lw$}{}",
        "common data dir",
        common_data_dir(name).display()
    );
    println!(
        "  {:<lw$}{}",
        "data home glob",
        data_home_dir(name, revision).display()
    );
    println!(
        "  {:<lw$}{}",
        "common data home glob",
        common_data_home_dir(name).display()
    );
    println!(
        "  {:<lw$}{}",
        "runtime dir glob",
        xdg_runtime_dirs(name).display()
    );

    if let Some(home) = home {
        println!();
        println!(
            "  {:<lw$}{}",
            "user data dir",
            user_data_dir(home, name, revision).display()
        );
        println!(
            "  {:<lw$}{}",
            "user common data dir",
            user_common_data_dir(home, name).display()
        );
    }

    if let Some(uid) = uid {
        if home.is_none() {
            println!();
        }
        println!(
            "  {:<lw$}{}",
            "user runtime dir",
            user_xdg_runtime_dir(uid, name).display()
        );
    }

    Ok(())
}
