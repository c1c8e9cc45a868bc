use anyhow::Result;
use protoc_resolve::platform::HostEnvironment;

pub fn print_env(json: bool) -> Result<()> {
    let report = HostEnvironment::live()?.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("os.name      {}", report.os_name);
    println!("os.arch      {}", report.cpu_architecture);
    println!(
        "flags        windows={} mac_os={} linux={}",
        report.windows, report.mac_os, report.linux
    );
    println!("PATH");
    for entry in &report.path {
        println!("  {}", entry.display());
    }
    if !report.path_extensions.is_empty() {
        println!("PATHEXT      {}", report.path_extensions.join(" "));
    }
    Ok(())
}
