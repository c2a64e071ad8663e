// Builds a small report and saves it.
//
//   cargo run --example report                 # HTML into the temp directory
//   cargo run --example report -- out.pdf      # via the configured PDF converter

use bloqs::{
    BlockOptions, BlockRef, BoxBlock, Code, Collapsible, Exporter, Grid, HRule, Markdown, SaveOptions,
    Spacing, TableBlock, TableData, VStack, block,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let summary = Markdown::new(
        r#"
        Weekly numbers for the **storage** team.

        * ingest is up
        * latency is flat
        "#,
        BlockOptions::new(),
    );

    let table = TableBlock::new(
        TableData::new(["Region", "Requests", "p99 ms"])
            .row([bloqs::CfgValue::from("eu-west"), 18_204_i64.into(), 41.25_f64.into()])
            .row([bloqs::CfgValue::from("us-east"), 25_930_i64.into(), 38.5_f64.into()]),
        BlockOptions::new().title("Traffic"),
    )
    .float_precision(1);

    let tiles = Grid::new(
        vec!["Uptime 99.98%", "Errors 0.02%", "Deploys 14"],
        BlockOptions::new().style("text_align", "center"),
    )?
    .cols(3);

    let job = Code::new(
        "compactor --level 3 --max-bytes 512M",
        "sh",
        BlockOptions::new().title("Compaction job").title_level(4),
    )?;

    let notes = Collapsible::new(
        vec![block("Rollout of the new compaction job slipped a week.")?, Arc::new(job)],
        BlockOptions::new().title("Notes").title_level(4),
    )?;

    let children: Vec<BlockRef> = vec![
        Arc::new(summary),
        Arc::new(tiles),
        Arc::new(HRule::new()),
        Arc::new(table),
        Arc::new(notes),
    ];
    let report: BlockRef = Arc::new(VStack::from_blocks(
        children,
        BlockOptions::new().title("Storage weekly").title_level(1),
    ));

    let exporter = Exporter::from_user_config()?;
    let options = match std::env::args().nth(1) {
        Some(filename) => SaveOptions::to_file(filename).footer(
            Arc::new(BoxBlock::new("Generated by bloqs", BlockOptions::new().style("font_size", "8pt"))?),
            Spacing::Millimetres(5.0),
        ),
        None => SaveOptions::to_format("html"),
    };

    let path = exporter.save(&report, &options)?;
    println!("{}", path.display());
    Ok(())
}
