use graphql_env_config::GraphQLEnvConfig;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(GraphQLEnvConfig);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("failed to serialize config schema: {}", err);
            std::process::exit(1);
        }
    }
}
