use error_stack::{Context, Report};

// figment errors carry the offending key and source as separate
// fields, they are attached one by one to keep them readable.
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, e: figment::Error) -> Report<T> {
        let mut this = self;
        for error in e {
            this = this.attach_printable(error.kind.to_string());

            if let (Some(profile), Some(md)) = (&error.profile, &error.metadata) {
                if !error.path.is_empty() {
                    let key = md.interpolate(profile, &error.path);
                    this = this.attach_printable(format!("for key {key:?}"));
                }
            }

            if let Some(md) = &error.metadata {
                if let Some(source) = &md.source {
                    this = this.attach_printable(format!("in {source} {}", md.name));
                } else {
                    this = this.attach_printable(format!("in {}", md.name));
                }
            }
        }
        this
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseError;
    use figment::Jail;

    #[test]
    fn attaches_offending_key() {
        Jail::expect_with(|jail| {
            jail.set_env("ASKHR_PORT", "eighty");

            let error = crate::config::Server::figment()
                .extract::<crate::config::Server>()
                .unwrap_err();

            let report = Report::new(ParseError).attach_figment_error(error);
            let rendered = format!("{report:?}");
            assert!(rendered.contains("eighty"), "{rendered}");
            Ok(())
        });
    }
}
