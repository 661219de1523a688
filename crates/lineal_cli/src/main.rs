mod scenarios;

#[cfg(not(target_env = "msvc"))]
use mimalloc::MiMalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "Usage: lineal <list|run|chain> [args]\n\
  list                     list built-in scenarios\n\
  run <scenario>           build the scenario, call its entry method, print the transcript\n\
  chain <scenario> <name>  print the resolution chain for <name> on the scenario's receiver";

fn main() {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(cmd) = argv.first().cloned() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    argv.remove(0);

    match cmd.as_str() {
        "list" => {
            for s in scenarios::SCENARIOS {
                println!("{} - {}", s.name, s.summary);
            }
        }
        "run" => {
            if argv.len() != 1 {
                eprintln!("Missing <scenario>");
                std::process::exit(2);
            }
            run_scenario(&argv[0]);
        }
        "chain" => {
            if argv.len() != 2 {
                eprintln!("Missing <scenario> <name>");
                std::process::exit(2);
            }
            dump_chain(&argv[0], &argv[1]);
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

fn run_scenario(name: &str) {
    let (mut rt, receiver, entry) = match scenarios::build(name) {
        Ok(Some(built)) => built,
        Ok(None) => {
            eprintln!("Unknown scenario: {name}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let result = rt.call(receiver, entry, &[]);
    print!("{}", rt.take_output());
    let value = match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if !value.is_unit() {
        println!("=> {value}");
    }

    match dump_modules(&rt, receiver) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn dump_modules(
    rt: &lineal_runtime::Engine,
    receiver: lineal_runtime::InstanceId,
) -> Result<Vec<String>, lineal_runtime::EngineError> {
    let label = rt.instance_label(receiver)?;
    let class = rt.class_of(receiver)?;
    let class_name = rt.class_name(class)?.to_string();
    let included = rt.included_modules(class)?;
    let singleton = rt.singleton_modules(receiver)?;
    Ok(vec![
        format!("receiver: {label}"),
        format!("included modules of {}: [{}]", class_name, included.join(", ")),
        format!("singleton modules of {}: [{}]", label, singleton.join(", ")),
    ])
}

fn dump_chain(name: &str, entry: &str) {
    let (rt, receiver, _) = match scenarios::build(name) {
        Ok(Some(built)) => built,
        Ok(None) => {
            eprintln!("Unknown scenario: {name}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    match rt.resolution_chain(receiver, entry) {
        Ok(chain) => {
            if chain.is_empty() {
                println!("(empty chain)");
                return;
            }
            for label in chain {
                println!("{label}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
