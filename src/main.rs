// TDSGrab - Serial image capture for oscilloscopes
use clap::Parser;
use std::process::ExitCode;
use tdsgrab::cli::{execute_command, Args, ConsoleWriter, OutputWriter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let writer = ConsoleWriter::new(args.output.clone());

    match execute_command(args, &writer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Err(output_error) = writer.write_error(&e.to_string()) {
                eprintln!("Error: {} ({})", e, output_error);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
