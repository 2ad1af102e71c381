use std::error::Error;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(
        &mut self,
        flag: &str,
    ) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Next positional argument, or a usage error
    pub fn require(&mut self, usage: &str) -> Result<String, Box<dyn Error>> {
        match self.iter.next() {
            Some(v) if !v.starts_with('-') || v == "-" => Ok(v),
            Some(flag) => Err(format!(
                "Unknown flag for {}: {flag}\nUsage: {usage}",
                self.command_name
            )
            .into()),
            None => Err(format!("Usage: {usage}").into()),
        }
    }

    /// Check if there are remaining arguments
    pub fn has_more(&self) -> bool {
        self.iter.len() > 0
    }

    /// Get next positional argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    /// Collect remaining args
    pub fn collect_remaining(self) -> Vec<String> {
        self.iter.collect()
    }

    pub fn unknown_flag(&self, flag: &str) -> Box<dyn Error> {
        format!("Unknown flag for {}: {flag}", self.command_name).into()
    }
}

/// Split `-n/--notebook <key>` out of free-form arguments.
pub fn split_notebook(
    args: Vec<String>,
) -> Result<(Option<String>, Vec<String>), Box<dyn Error>> {
    let mut notebook = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-n" | "--notebook" => match iter.next() {
                Some(v) => notebook = Some(v),
                None => {
                    return Err("Provide a notebook after -n/--notebook".into());
                }
            },
            _ => rest.push(arg),
        }
    }
    Ok((notebook, rest))
}
