#[cfg(test)]
mod batching;
#[cfg(test)]
mod graphiql;
#[cfg(test)]
mod probes;
#[cfg(test)]
mod testkit;
