use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmds;

#[derive(Parser)]
#[command(name = "protoc-gen-tsgen")]
#[command(about = "TypeScript client code generator for compiled protobuf descriptors", long_about = None)]
struct Cli {
    /* With no subcommand the binary runs as a protoc plugin: request on
     * stdin, response on stdout. */
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate TypeScript from a serialized FileDescriptorSet */
    Generate {
        /* Descriptor set file, as written by `protoc --descriptor_set_out` */
        #[arg(short = 'f', long = "descriptor-set", value_name = "FILE")]
        descriptor_set: PathBuf,

        /* Generation options as a flat `key[=value],...` string */
        #[arg(short = 'p', long = "options", value_name = "OPTS", default_value = "")]
        options: String,

        /* Output directory for generated code */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,

        /* Schema files to generate; defaults to every file in the set */
        #[arg(long = "file", value_name = "NAME")]
        files: Vec<String>,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Analyze a descriptor set: print the type map, per-method call shapes
     * and detected batch plans as JSON */
    Analyze {
        /* Descriptor set file, as written by `protoc --descriptor_set_out` */
        #[arg(short = 'f', long = "descriptor-set", value_name = "FILE")]
        descriptor_set: PathBuf,

        /* Generation options as a flat `key[=value],...` string */
        #[arg(short = 'p', long = "options", value_name = "OPTS", default_value = "")]
        options: String,

        /* Pretty-print the JSON report */
        #[arg(long = "pretty")]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => cmds::plugin::run(),

        Some(Commands::Generate {
            descriptor_set,
            options,
            output_dir,
            files,
            verbose,
        }) => cmds::generate::run(descriptor_set, options, output_dir, files, verbose),

        Some(Commands::Analyze {
            descriptor_set,
            options,
            pretty,
        }) => cmds::analyze::run(descriptor_set, options, pretty),
    }
}
