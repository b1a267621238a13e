use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::PanelConfig;
use crate::services::simulation_service::SimulationService;
use crate::storage::FileStore;

pub fn print_info(config: &PanelConfig) {
    println!("\n=== SAMODELKIN PANEL INFO ===");
    println!("Admin Path:  {}", config.admin_prefix());
    println!("Backend URL: {}", config.backend_url);
    println!("State file:  {}", config.state_file().display());
    println!("=============================\n");
}

/// Reset the counter simulation to its default state from the command line.
pub fn reset_simulation(config: &PanelConfig) -> Result<()> {
    let store = Arc::new(FileStore::open(config.state_file()));
    let simulation = SimulationService::new(store);
    simulation.reset("cli");

    let snap = simulation.snapshot();
    println!(
        "Simulation state reset: total_fake={}, online_active={}, total_active={}",
        snap.total_fake, snap.online_active, snap.total_active
    );

    Ok(())
}

pub fn install_service() -> Result<()> {
    let exe_path = env::current_exe()?;
    let exe_name = exe_path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Executable has no valid file name")?;
    let working_dir = env::current_dir()?;

    let service_content = format!(
        r#"[Unit]
Description=Samodelkin Community Admin Panel
After=network.target

[Service]
Type=simple
User=root
WorkingDirectory={}
ExecStart={} serve
Restart=always
EnvironmentFile={}/.env

[Install]
WantedBy=multi-user.target
"#,
        working_dir.display(),
        exe_path.display(),
        working_dir.display()
    );

    let service_path = format!("/etc/systemd/system/{}.service", exe_name);

    // Check if running as root
    if unsafe { libc::getuid() } != 0 {
        return Err(anyhow::anyhow!(
            "This command must be run as root (sudo) to install systemd service."
        ));
    }

    fs::write(&service_path, service_content)
        .context(format!("Failed to write service file to {}", service_path))?;

    println!("Systemd service created at {}", service_path);
    println!("You can now start the service using:");
    println!("  systemctl daemon-reload");
    println!("  systemctl enable --now {}", exe_name);

    Ok(())
}
