#[cfg(test)]
mod provisioning;
