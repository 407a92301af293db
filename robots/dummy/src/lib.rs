//! The `Dummy` robot packaged as a loadable plug-in (`libPluginDummy.so`), run
//! with `crobots PluginDummy --robot-dir target/debug`. The library name differs
//! from the built-in so that it is not shadowed by it.

crobots::export_robot!(crobots::robots::Dummy::new);
