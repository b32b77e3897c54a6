use log::{debug, info};
use std::env;

use recipe_book::{load_config, RecipeRepository};

const USAGE: &str = "Usage: recipe-book [--file PATH] <list | show INDEX | delete INDEX | check>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Show(usize),
    Delete(usize),
    Check,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    file: Option<String>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut file = None;
    let mut rest = args;

    if let [flag, path, tail @ ..] = rest {
        if flag == "--file" {
            file = Some(path.clone());
            rest = tail;
        }
    }

    let index = |value: Option<&String>| -> Result<usize, String> {
        let value = value.ok_or_else(|| format!("Missing index\n{}", USAGE))?;
        value
            .parse::<usize>()
            .map_err(|_| format!("'{}' is not a valid index", value))
    };

    let command = match rest.first().map(String::as_str) {
        Some("list") => Command::List,
        Some("show") => Command::Show(index(rest.get(1))?),
        Some("delete") => Command::Delete(index(rest.get(1))?),
        Some("check") => Command::Check,
        Some(other) => return Err(format!("Unknown command '{}'\n{}", other, USAGE)),
        None => return Err(USAGE.to_string()),
    };

    Ok(Invocation { file, command })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = parse_args(&args)?;

    let mut config = load_config()?;
    if let Some(file) = invocation.file {
        config.path = file;
    }

    let mut repository = RecipeRepository::from_config(&config)?;
    repository.subscribe(|book| debug!("Recipe book changed, {} recipes", book.len()));
    let count = repository.load()?;

    match invocation.command {
        Command::List => {
            for (index, recipe) in repository.get_all().iter().enumerate() {
                println!("{:>3}  {}", index, recipe);
            }
        }
        Command::Show(index) => {
            let recipe = repository.get_at(index)?;
            println!("{}", recipe.name);
            println!();
            for ingredient in &recipe.ingredients {
                println!("  - {}", ingredient);
            }
            println!();
            for instruction in &recipe.instructions {
                println!("{}", instruction);
            }
        }
        Command::Delete(index) => {
            let removed = repository.delete_at(index)?;
            repository.save()?;
            info!("Deleted '{}'", removed.name);
        }
        Command::Check => {
            println!("{}: {} recipes", repository.path().display(), count);
        }
    }

    Ok(())
}
