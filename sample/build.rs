fn main() -> Result<(), Box<dyn std::error::Error>> {
    let report = record_synth::Builder::new().source_root("src").run()?;
    if !report.is_ok() {
        return Err(format!("{} declaration(s) could not be generated", report.errors).into());
    }
    Ok(())
}
