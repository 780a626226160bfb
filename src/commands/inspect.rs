use crate::*;

pub fn handle_inspect_commands(cli: &Cli, settings: &Settings) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Order {
            payload,
            unreachable,
        } => {
            let raw = read_payload(payload)?;
            let project = bind_project(&raw, None)?;
            let mut options = CompileOptions::from_settings(settings);
            if let Some(policy) = unreachable {
                options.unreachable = *policy;
            }
            let ordering =
                ProjectCompiler::new(&settings.dialect, options).resolve(&project.content)?;
            let report = OrderReport {
                order: ordering.names(),
                dropped: ordering.dropped_names(),
            };
            print_one(cli.json, report, |r| {
                let mut lines = r.order.clone();
                if !r.dropped.is_empty() {
                    lines.push(format!("(dropped: {})", r.dropped.join(", ")));
                }
                lines.join("\n")
            })?;
        }
        Commands::TrainBody { payload, user } => {
            let raw = read_payload(payload)?;
            let project = bind_project(&raw, user.as_deref())?;
            print_one(cli.json, project.train_body(), |b| {
                serde_json::to_string_pretty(b).unwrap_or_default()
            })?;
        }
        Commands::Layers => {
            let catalog = Layer::catalog();
            print_out(cli.json, &catalog, |l| {
                let optional = if l.optional.is_empty() {
                    "-".to_string()
                } else {
                    l.optional.join(",")
                };
                format!("{}\trequired={}\toptional={}", l.kind, l.required.join(","), optional)
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}
